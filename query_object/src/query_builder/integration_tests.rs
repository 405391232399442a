//! Execution tests against an in-memory data source

#[cfg(test)]
mod integration_tests {
    use crate::errors::QueryError;
    use crate::query_builder::{Lookup, QueryBuilder, SortSpec};
    use crate::traits::{DataSource, MemoryDataSource, TableMetadata};
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Sale {
        id: u64,
        price: f64,
        status: String,
    }

    impl TableMetadata for Sale {
        fn table_name() -> &'static str {
            "sales"
        }
    }

    fn rows() -> Vec<serde_json::Value> {
        vec![
            json!({"id": 1, "price": 120.0, "status": "paid"}),
            json!({"id": 2, "price": 340.5, "status": "paid"}),
        ]
    }

    fn bound(source: &Arc<MemoryDataSource>) -> QueryBuilder<Sale> {
        let source: Arc<dyn DataSource> = source.clone();
        Sale::objects().using(source)
    }

    // ========================================
    // Reads
    // ========================================

    #[tokio::test]
    async fn test_all_decodes_rows() {
        let source = Arc::new(MemoryDataSource::new().with_rows(rows()));

        let sales = bound(&source)
            .filter(Lookup::new().with("price__gt", 100))
            .all()
            .await
            .unwrap();

        assert_eq!(sales.len(), 2);
        assert_eq!(sales[1].price, 340.5);
        assert_eq!(
            source.statements(),
            vec!["SELECT * FROM sales WHERE (price > 100)".to_string()]
        );
    }

    #[tokio::test]
    async fn test_first_applies_limit() {
        let source = Arc::new(MemoryDataSource::new().with_rows(rows()));

        let sale = bound(&source)
            .sort(SortSpec::new().desc("price"))
            .first()
            .await
            .unwrap();

        assert_eq!(sale.map(|s| s.id), Some(1));
        assert_eq!(
            source.statements(),
            vec!["SELECT * FROM sales ORDER BY price DESC LIMIT 1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_first_on_empty_result() {
        let source = Arc::new(MemoryDataSource::new());
        assert_eq!(bound(&source).first().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_decode_failure_names_table() {
        let source = Arc::new(MemoryDataSource::new().with_rows(vec![json!({"id": "x"})]));

        let err = bound(&source).all().await.unwrap_err();
        match err {
            QueryError::Decode { table, .. } => assert_eq!(table, "sales"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unbound_builder_fails() {
        let err = Sale::objects().all().await.unwrap_err();
        assert!(matches!(err, QueryError::NoDataSource(table) if table == "sales"));
    }

    #[tokio::test]
    async fn test_source_errors_propagate() {
        let source = Arc::new(MemoryDataSource::new().failing("timeout"));
        let err = bound(&source).count().await.unwrap_err();
        assert!(matches!(err, QueryError::DataSource(_)));
    }

    // ========================================
    // count()
    // ========================================

    #[tokio::test]
    async fn test_count_rewrites_projection() {
        let source = Arc::new(
            MemoryDataSource::new().respond_to("count()", vec![json!({"count": "42"})]),
        );

        let count = bound(&source)
            .project(["id", "price"])
            .filter(Lookup::new().with("status", "paid"))
            .count()
            .await
            .unwrap();

        assert_eq!(count, 42);
        assert_eq!(
            source.statements(),
            vec!["SELECT count() AS count FROM sales WHERE (status = 'paid')".to_string()]
        );
    }

    #[tokio::test]
    async fn test_count_accepts_numbers() {
        let source = Arc::new(MemoryDataSource::new().with_rows(vec![json!({"count": 7})]));
        assert_eq!(bound(&source).count().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_count_with_offset_skips_the_count_row() {
        let source = Arc::new(MemoryDataSource::new());

        let err = bound(&source).offset(10).count().await.unwrap_err();

        assert!(matches!(err, QueryError::UnexpectedResult(_)));
        assert_eq!(
            source.statements(),
            vec!["SELECT count() AS count FROM sales OFFSET 10".to_string()]
        );
    }

    #[tokio::test]
    async fn test_count_rejects_bad_shapes() {
        let empty = Arc::new(MemoryDataSource::new());
        assert!(matches!(
            bound(&empty).count().await,
            Err(QueryError::UnexpectedResult(_))
        ));

        let garbage = Arc::new(MemoryDataSource::new().with_rows(vec![json!({"count": "many"})]));
        assert!(matches!(
            bound(&garbage).count().await,
            Err(QueryError::UnexpectedResult(_))
        ));
    }

    // ========================================
    // Cursor
    // ========================================

    #[tokio::test]
    async fn test_next_pulls_rows_lazily() {
        let source = Arc::new(MemoryDataSource::new().with_rows(rows()));
        let mut builder = bound(&source);

        assert!(source.statements().is_empty());

        let first = builder.next().await.unwrap().unwrap();
        let second = builder.next().await.unwrap().unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(builder.next().await.unwrap(), None);
        assert_eq!(builder.next().await.unwrap(), None);

        // One statement for the whole iteration
        assert_eq!(source.statements().len(), 1);
    }

    #[tokio::test]
    async fn test_reset_iterator_reruns_statement() {
        let source = Arc::new(MemoryDataSource::new().with_rows(rows()));
        let mut builder = bound(&source);

        assert_eq!(builder.next().await.unwrap().map(|s| s.id), Some(1));
        builder.reset_iterator();
        assert_eq!(builder.next().await.unwrap().map(|s| s.id), Some(1));

        assert_eq!(source.statements().len(), 2);
        assert_eq!(source.statements()[0], source.statements()[1]);
    }

    #[tokio::test]
    async fn test_clone_does_not_share_cursor() {
        let source = Arc::new(MemoryDataSource::new().with_rows(rows()));
        let mut builder = bound(&source);
        builder.next().await.unwrap();

        let mut copy = builder.clone();
        assert_eq!(copy.next().await.unwrap().map(|s| s.id), Some(1));
        assert_eq!(builder.next().await.unwrap().map(|s| s.id), Some(2));
    }

    // ========================================
    // delete()
    // ========================================

    #[tokio::test]
    async fn test_delete_issues_mutation() {
        let source = Arc::new(MemoryDataSource::new());

        bound(&source)
            .filter(Lookup::new().with("status", "void"))
            .exclude(Lookup::new().with("id", 1))
            .delete()
            .await
            .unwrap();

        assert_eq!(
            source.statements(),
            vec!["ALTER TABLE sales DELETE WHERE ((status = 'void') AND (id != 1))".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unfiltered_delete_is_refused() {
        let source = Arc::new(MemoryDataSource::new());

        let err = bound(&source).delete().await.unwrap_err();

        assert!(matches!(err, QueryError::UnfilteredDelete(table) if table == "sales"));
        assert!(source.statements().is_empty());
    }
}
