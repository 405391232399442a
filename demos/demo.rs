use clickhaus::prelude::*;
use serde_json::json;
use std::sync::Arc;

#[model]
#[table(name = "sales")]
pub struct Sale {
    pub id: u64,
    pub price: f64,
    pub status: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    println!("🚀 ClickHaus Demo\n");

    // Canned rows stand in for a live ClickHouse server
    let source: Arc<dyn DataSource> = Arc::new(
        MemoryDataSource::new()
            .with_rows(vec![
                json!({"id": 1, "price": 129.0, "status": "paid"}),
                json!({"id": 2, "price": 349.5, "status": "shipped"}),
            ])
            .respond_to("count()", vec![json!({"count": "2"})]),
    );

    let clickhaus = ClickHaus::new(source);
    clickhaus.health_check().await?;
    println!("✅ Data source ready");

    let expensive = clickhaus
        .objects::<Sale>()
        .filter(Lookup::new().with("price__gt", 100))
        .exclude(Lookup::new().with("status", "inactive"))
        .sort(SortSpec::new().desc("price"));

    println!("📝 {}", expensive.to_sql());
    for sale in expensive.all().await? {
        println!("   #{} {:>8.2} {}", sale.id, sale.price, sale.status);
    }
    println!("🔢 {} matching sales", expensive.count().await?);

    // Pull rows one at a time
    let mut cursor = expensive.limit(10);
    while let Some(sale) = cursor.next().await? {
        println!("➡️  streamed #{}", sale.id);
    }

    let either = Q::new()
        .or(vec![
            Lookup::new().with("status__in", vec!["paid", "shipped"]),
            Lookup::new().nested("customer", Lookup::new().with("tier", "gold")),
        ])
        .not(Lookup::new().with("note__icontains", "test"));
    println!("🧩 {}", either.to_sql());

    Ok(())
}
