mod common;

use common::*;
use rdbprovider::{
    DbError, PropertyValue, ProviderConfig, Query, QueryParameter, QueryType,
    StorageProviderCommand, Value,
};

fn collection(statement: &str) -> Query {
    Query::new("ordersOfCustomer", PROVIDER, statement, QueryType::Collection)
}

#[test]
fn test_collection_query_reads_containers_of_any_class() {
    let query = collection(
        "SELECT * FROM [dbo].[Orders] WHERE [CustomerID] = @customer AND [OrderNumber] > @min",
    )
    .with_parameter(QueryParameter::value("@customer", oid("Company", 100)))
    .with_parameter(QueryParameter::value("@min", Value::Integer(1000)));
    let command = factories().query().create_for_data_container_query(&query).unwrap();
    let customer = oid("Company", 100);
    let mut context = FakeContext::new(move |_| {
        result(
            &ORDER_COLUMNS,
            vec![order_row(1, 1001, Some(&customer)), order_row(2, 1002, Some(&customer))],
        )
    });

    let orders = command.execute(&mut context).unwrap();

    assert_eq!(context.texts(), vec![query.statement.as_str()]);
    let parameters = context.executed[0].parameters();
    assert_eq!(parameters[0].name, "@customer");
    assert_eq!(parameters[0].value, Value::Integer(100));
    assert_eq!(parameters[1].value, Value::Integer(1000));

    let orders: Vec<_> = orders.into_iter().map(|o| o.unwrap()).collect();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[1].id(), &oid("Order", 2));
    assert_eq!(
        orders[1].value("OrderNumber"),
        Some(&PropertyValue::Scalar(Value::Integer(1002)))
    );
}

#[test]
fn test_collection_query_row_without_id_is_none() {
    let query = collection("SELECT o.* FROM [dbo].[Company] c LEFT JOIN [dbo].[Orders] o ON o.[CustomerID] = c.[ID]");
    let command = factories().query().create_for_data_container_query(&query).unwrap();
    let mut context = FakeContext::new(|_| {
        result(
            &ORDER_COLUMNS,
            vec![
                order_row(1, 1001, None),
                vec![Value::Null, Value::Null, Value::Null, Value::Null, Value::Null, Value::Null],
            ],
        )
    });

    let orders = command.execute(&mut context).unwrap();

    assert!(orders[0].is_some());
    assert!(orders[1].is_none());
}

#[test]
fn test_custom_query_returns_raw_rows() {
    let query = Query::new(
        "productCounts",
        PROVIDER,
        "SELECT [Product], COUNT(*) AS [Count] FROM [dbo].[OrderItem] GROUP BY [Product]",
        QueryType::Custom,
    );
    let command = factories().query().create_for_custom_query(&query).unwrap();
    let mut context = FakeContext::new(|_| {
        result(
            &["Product", "Count"],
            vec![vec![text("Keyboard"), Value::Integer(3)]],
        )
    });

    let rows = command.execute(&mut context).unwrap();

    assert_eq!(rows.columns, vec!["Product", "Count"]);
    assert_eq!(rows.rows.len(), 1);
}

#[test]
fn test_scalar_query_returns_first_value() {
    let query = Query::new(
        "orderCount",
        PROVIDER,
        "SELECT COUNT(*) FROM [dbo].[Orders]",
        QueryType::Scalar,
    );
    let command = factories().query().create_for_scalar_query(&query).unwrap();
    let mut context = FakeContext::new(|_| result(&["Count"], vec![vec![Value::Integer(5)]]));

    assert_eq!(command.execute(&mut context).unwrap(), Value::Integer(5));
}

#[test]
fn test_text_parameters_are_spliced_before_validation() {
    let query = Query::new(
        "itemsOf",
        PROVIDER,
        "SELECT * FROM @table WHERE [OrderID] = @order",
        QueryType::Custom,
    )
    .with_parameter(QueryParameter::text("@table", text("[dbo].[OrderItem]")))
    .with_parameter(QueryParameter::value("@order", oid("Order", 1)));
    let command = factories().query().create_for_custom_query(&query).unwrap();
    let mut context = FakeContext::empty();

    command.execute(&mut context).unwrap();

    assert_eq!(
        context.texts(),
        vec!["SELECT * FROM [dbo].[OrderItem] WHERE [OrderID] = @order"]
    );
    assert_eq!(context.executed[0].parameters().len(), 1);
}

#[test]
fn test_query_of_other_type_is_rejected() {
    let query = Query::new("orderCount", PROVIDER, "SELECT COUNT(*) FROM [dbo].[Orders]", QueryType::Scalar);
    let factories = factories();

    let err = factories.query().create_for_data_container_query(&query).unwrap_err();
    assert!(matches!(err, DbError::ArgumentError { argument: "query", .. }));

    let err = factories.query().create_for_custom_query(&query).unwrap_err();
    assert!(matches!(err, DbError::ArgumentError { argument: "query", .. }));
}

#[test]
fn test_query_of_other_provider_is_rejected() {
    let query = Query::new("ledger", "Accounting", "SELECT * FROM [dbo].[Ledger]", QueryType::Collection);

    let err = factories().query().create_for_data_container_query(&query).unwrap_err();

    assert!(matches!(err, DbError::ArgumentError { argument: "query", .. }));
}

#[test]
fn test_non_query_statements_are_rejected() {
    let factories = factories();

    let delete = collection("DELETE FROM [dbo].[Orders]");
    assert!(matches!(
        factories.query().create_for_data_container_query(&delete).unwrap_err(),
        DbError::ArgumentError { argument: "statement", .. }
    ));

    let two = collection("SELECT * FROM [dbo].[Orders]; SELECT * FROM [dbo].[OrderItem]");
    assert!(matches!(
        factories.query().create_for_data_container_query(&two).unwrap_err(),
        DbError::ArgumentError { argument: "statement", .. }
    ));

    let broken = collection("SELECT * FROM");
    assert!(matches!(
        factories.query().create_for_data_container_query(&broken).unwrap_err(),
        DbError::ParseError(_)
    ));
}

#[test]
fn test_statements_pass_unchecked_when_validation_is_off() {
    let factories = factories_with(ProviderConfig::new(PROVIDER).validate_query_statements(false));
    let query = collection("EXEC [dbo].[LoadOrders]");

    let command = factories.query().create_for_data_container_query(&query).unwrap();
    let mut context = FakeContext::empty();

    assert!(command.execute(&mut context).unwrap().is_empty());
    assert_eq!(context.texts(), vec!["EXEC [dbo].[LoadOrders]"]);
}
