#![allow(dead_code)]

use std::sync::Arc;

use rdbprovider::core::{ColumnDefinition, DataType, StorageTypeInformation};
use rdbprovider::mapping::{
    ClassDefinition, EmptyViewDefinition, EntityDefinition, EntityName, FilterViewDefinition,
    MappingConfiguration, ObjectIdStoragePropertyDefinition, PropertyDefinition,
    StoragePropertyDefinition, TableDefinition, UnionViewDefinition,
};
use rdbprovider::{
    DbCommand, ExecutionContext, ObjectId, ProviderCommandFactory, ProviderConfig, QueryResult,
    Result, Value,
};
use sqlparser::dialect::MsSqlDialect;
use sqlparser::parser::Parser;

pub const PROVIDER: &str = "Default";

pub fn int_column(name: &str) -> ColumnDefinition {
    ColumnDefinition::new(name, StorageTypeInformation::new(DataType::Integer, "int"))
}

pub fn text_column(name: &str) -> ColumnDefinition {
    ColumnDefinition::new(name, StorageTypeInformation::new(DataType::Text, "nvarchar(100)"))
}

fn object_id_property() -> ObjectIdStoragePropertyDefinition {
    ObjectIdStoragePropertyDefinition::new(
        int_column("ID").primary_key(),
        ColumnDefinition::new(
            "ClassID",
            StorageTypeInformation::new(DataType::Text, "varchar(100)").not_null(),
        ),
    )
}

fn timestamp_column() -> ColumnDefinition {
    ColumnDefinition::new(
        "Timestamp",
        StorageTypeInformation::new(DataType::Binary, "rowversion").not_null(),
    )
}

pub fn simple(name: &str, column: ColumnDefinition) -> PropertyDefinition {
    PropertyDefinition::new(name, StoragePropertyDefinition::Simple(column))
}

/// A foreign key property stored in `<Name>ID` and `<Name>IDClassID`.
pub fn relation(name: &str) -> PropertyDefinition {
    PropertyDefinition::new(
        name,
        StoragePropertyDefinition::ObjectId(ObjectIdStoragePropertyDefinition::new(
            int_column(&format!("{}ID", name)),
            text_column(&format!("{}IDClassID", name)),
        )),
    )
}

pub fn table(provider: &str, name: &str, properties: &[PropertyDefinition]) -> TableDefinition {
    TableDefinition {
        storage_provider_id: provider.to_string(),
        table_name: EntityName::with_schema("dbo", name),
        object_id_property: object_id_property(),
        timestamp_column: timestamp_column(),
        data_properties: properties
            .iter()
            .filter(|p| p.is_persistent())
            .map(|p| p.storage_property.clone())
            .collect(),
    }
}

fn class(id: &str, entity: EntityDefinition, properties: Vec<PropertyDefinition>) -> ClassDefinition {
    properties
        .into_iter()
        .fold(ClassDefinition::new(id, entity), |class, p| class.with_property(p))
}

pub fn order_properties() -> Vec<PropertyDefinition> {
    vec![
        simple("OrderNumber", int_column("OrderNumber")),
        relation("Customer"),
        simple("Notes", text_column("Notes")).transaction_only(),
    ]
}

pub fn order_item_properties() -> Vec<PropertyDefinition> {
    vec![
        simple("Position", int_column("Position")),
        simple("Product", text_column("Product")),
        relation("Order"),
    ]
}

fn company_properties() -> Vec<PropertyDefinition> {
    vec![simple("Name", text_column("Name")), relation("Region")]
}

fn person_properties() -> Vec<PropertyDefinition> {
    vec![
        simple("Name", text_column("Name")),
        relation("Region"),
        simple("FirstName", text_column("FirstName")),
    ]
}

/// Orders with items, customers stored as companies or persons behind a
/// union view, a filter view over orders, an always-empty archive and one
/// class of a foreign provider.
pub fn sample_mapping() -> MappingConfiguration {
    let order_table = table(PROVIDER, "Orders", &order_properties());
    let company_table = table(PROVIDER, "Company", &company_properties());
    let person_table = table(PROVIDER, "Person", &person_properties());

    let customer_view = UnionViewDefinition {
        storage_provider_id: PROVIDER.to_string(),
        view_name: EntityName::with_schema("dbo", "CustomerView"),
        object_id_property: object_id_property(),
        union_entities: vec![
            EntityDefinition::Table(company_table.clone()),
            EntityDefinition::Table(person_table.clone()),
        ],
    };

    let special_order_view = FilterViewDefinition {
        storage_provider_id: PROVIDER.to_string(),
        view_name: EntityName::with_schema("dbo", "SpecialOrderView"),
        base_entity: Box::new(EntityDefinition::Table(order_table.clone())),
    };

    let archive_view = EmptyViewDefinition {
        storage_provider_id: PROVIDER.to_string(),
        view_name: EntityName::with_schema("dbo", "ArchivedOrderItemView"),
    };

    let classes = vec![
        class("Order", EntityDefinition::Table(order_table), order_properties()),
        class(
            "OrderItem",
            EntityDefinition::Table(table(PROVIDER, "OrderItem", &order_item_properties())),
            order_item_properties(),
        ),
        class(
            "Region",
            EntityDefinition::Table(table(PROVIDER, "Region", &[simple("Name", text_column("Name"))])),
            vec![simple("Name", text_column("Name"))],
        ),
        class("Company", EntityDefinition::Table(company_table), company_properties()),
        class("Person", EntityDefinition::Table(person_table), person_properties()),
        class(
            "Customer",
            EntityDefinition::UnionView(customer_view),
            vec![simple("Name", text_column("Name")), relation("Region")],
        ),
        class(
            "SpecialOrder",
            EntityDefinition::FilterView(special_order_view),
            order_properties(),
        ),
        class(
            "ArchivedOrderItem",
            EntityDefinition::EmptyView(archive_view),
            vec![relation("Order")],
        ),
        class(
            "Ledger",
            EntityDefinition::Table(table(
                "Accounting",
                "Ledger",
                &[simple("Amount", int_column("Amount"))],
            )),
            vec![simple("Amount", int_column("Amount"))],
        ),
    ];

    MappingConfiguration::new(classes).expect("sample mapping is valid")
}

pub fn factories() -> ProviderCommandFactory {
    factories_with(ProviderConfig::new(PROVIDER))
}

pub fn factories_with(config: ProviderConfig) -> ProviderCommandFactory {
    ProviderCommandFactory::new(&config, Arc::new(sample_mapping()))
}

pub fn oid(class_id: &str, value: i64) -> ObjectId {
    ObjectId::new(class_id, Value::Integer(value))
}

pub fn timestamp(version: u8) -> Value {
    Value::Binary(vec![0, 0, 0, 0, 0, 0, 0, version])
}

pub fn result(columns: &[&str], rows: Vec<Vec<Value>>) -> QueryResult {
    QueryResult::new(columns.iter().map(|c| c.to_string()).collect(), rows)
}

pub fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

/// Asserts that `sql` parses as T-SQL.
pub fn assert_parses(sql: &str) {
    if let Err(err) = Parser::parse_sql(&MsSqlDialect {}, sql) {
        panic!("generated SQL does not parse: {}\n{}", err, sql);
    }
}

type Responder = Box<dyn FnMut(&DbCommand) -> QueryResult>;

/// Execution context driven by a closure: every reader command is answered by
/// `responder`, non-queries report `affected_rows`. Executed commands are
/// recorded in order.
pub struct FakeContext {
    responder: Responder,
    pub affected_rows: usize,
    pub executed: Vec<DbCommand>,
}

impl FakeContext {
    pub fn new(responder: impl FnMut(&DbCommand) -> QueryResult + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            affected_rows: 1,
            executed: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(|_| QueryResult::empty())
    }

    pub fn texts(&self) -> Vec<&str> {
        self.executed.iter().map(|c| c.text()).collect()
    }
}

impl ExecutionContext for FakeContext {
    fn execute_reader(&mut self, command: &DbCommand) -> Result<QueryResult> {
        self.executed.push(command.clone());
        Ok((self.responder)(command))
    }

    fn execute_scalar(&mut self, command: &DbCommand) -> Result<Value> {
        self.executed.push(command.clone());
        Ok((self.responder)(command).scalar())
    }

    fn execute_non_query(&mut self, command: &DbCommand) -> Result<usize> {
        self.executed.push(command.clone());
        Ok(self.affected_rows)
    }
}

/// Answers every SELECT from an in-memory copy of the tables: the table is
/// found by its delimited name in the command text, rows are filtered by the
/// bound `@ID...` parameters and returned in reverse order, so callers cannot
/// rely on the database returning rows in request order.
pub fn table_responder(
    tables: Vec<(&'static str, QueryResult)>,
) -> impl FnMut(&DbCommand) -> QueryResult {
    move |command| {
        let Some((_, table)) = tables
            .iter()
            .find(|(name, _)| command.text().contains(&format!("[dbo].[{}]", name)))
        else {
            return QueryResult::empty();
        };

        let ids: Vec<&Value> = command
            .parameters()
            .iter()
            .filter(|p| p.name.starts_with("@ID"))
            .map(|p| &p.value)
            .collect();
        let id_ordinal = table
            .columns
            .iter()
            .position(|c| c == "ID")
            .expect("table has an ID column");

        let mut rows: Vec<_> = table
            .rows
            .iter()
            .filter(|row| ids.contains(&&row[id_ordinal]))
            .cloned()
            .collect();
        rows.reverse();
        QueryResult::new(table.columns.clone(), rows)
    }
}

pub const ORDER_COLUMNS: [&str; 6] = [
    "ID",
    "ClassID",
    "Timestamp",
    "OrderNumber",
    "CustomerID",
    "CustomerIDClassID",
];

pub const ORDER_ITEM_COLUMNS: [&str; 7] = [
    "ID",
    "ClassID",
    "Timestamp",
    "Position",
    "Product",
    "OrderID",
    "OrderIDClassID",
];

pub fn order_row(id: i64, number: i64, customer: Option<&ObjectId>) -> Vec<Value> {
    vec![
        Value::Integer(id),
        text("Order"),
        timestamp(id as u8),
        Value::Integer(number),
        customer.map_or(Value::Null, |c| c.value().clone()),
        customer.map_or(Value::Null, |c| text(c.class_id())),
    ]
}

pub fn order_item_row(id: i64, position: i64, product: &str, order: i64) -> Vec<Value> {
    vec![
        Value::Integer(id),
        text("OrderItem"),
        timestamp(id as u8),
        Value::Integer(position),
        text(product),
        Value::Integer(order),
        text("Order"),
    ]
}
