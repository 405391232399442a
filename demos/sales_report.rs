use clickhaus::prelude::*;
use serde_json::json;
use std::sync::Arc;

#[model]
#[table(name = "analytics.sales", engine = "ReplacingMergeTree(version)")]
pub struct Sale {
    pub id: u64,
    pub category: String,
    pub revenue: f64,
    pub cost: f64,
    pub version: u32,
}

#[derive(Debug, Deserialize, TableMetadata)]
#[table(name = "analytics.sales", engine = "ReplacingMergeTree(version)")]
pub struct CategoryTotals {
    pub category: String,
    pub revenue: f64,
    pub margin: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config.query,
        Err(e) => {
            println!("⚠️  {}; using default query settings", e);
            QueryConfig::default()
        }
    };

    let source: Arc<dyn DataSource> = Arc::new(MemoryDataSource::new().with_rows(vec![
        json!({"category": "books", "revenue": 1200.0, "margin": 310.0}),
        json!({"category": "games", "revenue": 860.0, "margin": 120.5}),
    ]));
    let clickhaus = ClickHaus::new(source).with_query_config(config);

    let margin = (AggregationNode::sum("revenue") - AggregationNode::sum("cost")).with_alias("margin");

    let report = clickhaus
        .objects::<CategoryTotals>()
        .with_final()?
        .aggregate([
            ("category", AggregationNode::function("any", "category")),
            ("revenue", AggregationNode::sum("revenue")),
            ("ignored", margin),
        ])
        .filter(Lookup::new().with("category__ne", "internal"))
        .group_by(["category"])
        .having(Lookup::new().with("revenue__gte", 500))
        .sort(SortSpec::try_from(json!({"margin": -1}))?);

    println!("📝 {}", report.to_sql());
    for row in report.all().await? {
        println!("   {:<8} revenue {:>8.2} margin {:>8.2}", row.category, row.revenue, row.margin);
    }

    // Compile-only view over the raw table
    let latest = Sale::objects()
        .with_final()?
        .filter(Lookup::new().with("version__gt", 3))
        .as_subquery();
    println!("🧾 {}", latest.sql());

    Ok(())
}
