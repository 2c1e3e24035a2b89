use anyhow::Context;
use sheetquery::prelude::*;

fn main() -> anyhow::Result<()> {
    println!("🚀 SheetQuery Demo\n");

    // Configuration from sheetquery.toml, SHEETQUERY_CONFIG or built-in defaults
    let service = QueryService::load().context("loading query configuration")?;
    println!(
        "✅ Configuration loaded (param prefix '{}')",
        service.compiler().options().param_prefix
    );

    // A sheet as the frontend sends it
    let sheet = QueryConfig::from_json(
        r#"{
            "tableConfig": {
                "datasetId": "ledger_entries",
                "columns": [{"column": "entry_id"}, {"column": "account"}, {"column": "posted_at"}]
            },
            "filters": {
                "logicalOperator": "AND",
                "conditions": [
                    {"column": {"column": "account", "datatype": "string"}, "operator": "startswith", "value": "4"},
                    {"column": {"column": "posted_at", "datatype": "date"}, "operator": "gte", "value": "2024-01-01"}
                ]
            },
            "orderBy": [{"column": {"column": "posted_at"}, "order": "DESC"}],
            "countAll": true,
            "pagination": {"page": 1, "pageSize": 25}
        }"#,
    )
    .context("decoding sheet")?;

    let (sql, params) = service.to_sql(&sheet)?;
    println!("\n📄 Page query:\n  {}", sql);
    for (key, dataset) in &params {
        println!("  {{{{.{}}}}} -> {}", key, dataset);
    }

    let (count, _) = service.count_sql(&sheet)?;
    println!("\n🔢 Count query:\n  {}", count);

    // Option list for a column filter, narrowed by the sheet's own filters
    let request = FilterOptionsRequest::new(
        "ledger_entries",
        ColumnConfig::typed("account", Datatype::String),
    )
    .with_filters(sheet.filters.clone())
    .with_limit(100);
    let (options, _) = service.filter_options_sql(&request)?;
    println!("\n🔽 Filter options query:\n  {}", options);

    // Grouped report with a custom amount column
    let amount = CustomDataConfig::new(
        AMOUNT_TYPE,
        serde_json::json!({"amountColumn": "amount", "currencyColumn": "currency", "fxCurrency": "EUR"}),
    );
    let report = QueryConfig::new(TableConfig::new("ledger_entries"))
        .with_group_by(GroupBy::new(
            ColumnConfig::typed("account", Datatype::String).with_alias("Account"),
        ))
        .with_aggregation(Aggregation::sum(
            ColumnConfig::new("amount").with_custom_type(amount),
            "balance",
        ))
        .with_order_by(OrderBy::desc(ColumnConfig::new("balance").with_alias("balance")));
    let (report_sql, _) = service.to_sql(&report)?;
    println!("\n📊 Report query:\n  {}", report_sql);

    println!("\n🎉 Demo completed!");
    Ok(())
}
