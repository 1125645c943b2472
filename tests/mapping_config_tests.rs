mod common;

use std::io::Write;

use common::*;
use rdbprovider::mapping::{
    ClassDefinition, EntityDefinition, EntityName, FilterViewDefinition, ResolvedEntity,
    TableDefinition, UnionViewDefinition,
};
use rdbprovider::{DataType, DbError, MappingConfiguration, ProviderConfig, StorageProvider};
use tempfile::NamedTempFile;

const MAPPING: &str = r#"{
  "infrastructure": {
    "object_id_property": {
      "value": { "name": "ObjectID", "storage_type": { "data_type": "integer", "native_type": "int", "nullable": false } },
      "class_id": { "name": "ObjectClassID", "storage_type": { "data_type": "text", "native_type": "varchar(100)" } }
    },
    "timestamp_column": { "name": "RowVersion", "storage_type": { "data_type": "binary", "native_type": "rowversion" } }
  },
  "classes": [
    {
      "id": "Region",
      "storage_entity": {
        "kind": "table",
        "storage_provider_id": "Default",
        "table_name": { "schema": "dbo", "name": "Region" },
        "object_id_property": {
          "value": { "name": "ObjectID", "storage_type": { "data_type": "integer", "native_type": "int" } },
          "class_id": { "name": "ObjectClassID", "storage_type": { "data_type": "text", "native_type": "varchar(100)" } }
        },
        "timestamp_column": { "name": "RowVersion", "storage_type": { "data_type": "binary", "native_type": "rowversion" } },
        "data_properties": [
          { "simple": { "name": "Name", "storage_type": { "data_type": "text", "native_type": "nvarchar(100)" } } }
        ]
      },
      "properties": [
        {
          "name": "Name",
          "storage_property": { "simple": { "name": "Name", "storage_type": { "data_type": "text", "native_type": "nvarchar(100)" } } }
        },
        {
          "name": "DisplayName",
          "storage_property": { "simple": { "name": "DisplayName", "storage_type": { "data_type": "text", "native_type": "nvarchar(100)" } } },
          "storage_class": "transaction"
        }
      ]
    },
    {
      "id": "ArchivedRegion",
      "storage_entity": {
        "kind": "empty_view",
        "storage_provider_id": "Default",
        "view_name": { "name": "ArchivedRegionView" }
      }
    }
  ]
}"#;

#[test]
fn test_load_mapping_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(MAPPING.as_bytes()).unwrap();

    let mapping = MappingConfiguration::load(file.path()).unwrap();

    assert_eq!(mapping.classes().len(), 2);
    let region = mapping.class("Region").unwrap();
    let ResolvedEntity::Table(table) = region.storage_entity.resolve() else {
        panic!("Region is stored in a table");
    };
    assert_eq!(table.table_name, EntityName::with_schema("dbo", "Region"));
    assert_eq!(table.object_id_property.value.storage_type.data_type, DataType::Integer);
    assert!(!region.property("DisplayName").unwrap().is_persistent());
    assert!(!region.has_relation_properties());

    assert!(matches!(
        mapping.class("ArchivedRegion").unwrap().storage_entity.resolve(),
        ResolvedEntity::Empty(_)
    ));

    let infrastructure = mapping.infrastructure();
    assert_eq!(infrastructure.object_id_property.value.name, "ObjectID");
    assert!(!infrastructure.object_id_property.value.storage_type.nullable);
    assert_eq!(infrastructure.timestamp_column.name, "RowVersion");
}

#[test]
fn test_missing_mapping_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = MappingConfiguration::load(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, DbError::IoError(_)));
}

#[test]
fn test_infrastructure_defaults_when_omitted() {
    let mapping = MappingConfiguration::from_json_str(r#"{ "classes": [] }"#).unwrap();

    let infrastructure = mapping.infrastructure();
    assert_eq!(infrastructure.object_id_property.value.name, "ID");
    assert_eq!(infrastructure.object_id_property.class_id.name, "ClassID");
    assert_eq!(infrastructure.timestamp_column.name, "Timestamp");
}

#[test]
fn test_invalid_mapping_document_is_rejected() {
    let err = MappingConfiguration::from_json_str(r#"{ "classes": [ { "id": "Region" } ] }"#)
        .unwrap_err();
    assert!(matches!(err, DbError::ConfigError(_)));
}

#[test]
fn test_duplicate_class_is_rejected() {
    let mapping = sample_mapping();
    let region = mapping.class("Region").unwrap().clone();

    let err = MappingConfiguration::new(vec![region.clone(), region]).unwrap_err();
    assert!(matches!(err, DbError::MappingError(_)));
}

#[test]
fn test_duplicate_property_is_rejected() {
    let region = ClassDefinition::new(
        "Region",
        EntityDefinition::Table(table(PROVIDER, "Region", &[])),
    )
    .with_property(simple("Name", text_column("Name")))
    .with_property(simple("Name", text_column("Name")));

    let err = MappingConfiguration::new(vec![region]).unwrap_err();
    assert!(matches!(err, DbError::MappingError(_)));
}

#[test]
fn test_union_view_without_entities_is_rejected() {
    let view = UnionViewDefinition {
        storage_provider_id: PROVIDER.to_string(),
        view_name: EntityName::new("CustomerView"),
        object_id_property: table(PROVIDER, "Company", &[]).object_id_property,
        union_entities: Vec::new(),
    };
    let class = ClassDefinition::new("Customer", EntityDefinition::UnionView(view));

    let err = MappingConfiguration::new(vec![class]).unwrap_err();
    assert!(matches!(err, DbError::MappingError(_)));
}

#[test]
fn test_filter_view_across_providers_is_rejected() {
    let view = FilterViewDefinition {
        storage_provider_id: PROVIDER.to_string(),
        view_name: EntityName::new("BigLedgerView"),
        base_entity: Box::new(EntityDefinition::Table(table("Accounting", "Ledger", &[]))),
    };
    let class = ClassDefinition::new("BigLedger", EntityDefinition::FilterView(view));

    let err = MappingConfiguration::new(vec![class]).unwrap_err();
    assert!(matches!(err, DbError::MappingError(_)));
}

#[test]
fn test_provider_uses_loaded_mapping_and_config() {
    let mut mapping_file = NamedTempFile::new().unwrap();
    mapping_file.write_all(MAPPING.as_bytes()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("provider.json");
    ProviderConfig::new(PROVIDER)
        .max_set_comparison_values(50)
        .save(&config_path)
        .unwrap();

    let provider = StorageProvider::new(
        ProviderConfig::load(&config_path).unwrap(),
        MappingConfiguration::load(mapping_file.path()).unwrap(),
    )
    .unwrap();

    assert_eq!(provider.config().max_set_comparison_values, 50);
    assert!(provider.mapping().class("Region").is_ok());
}

#[test]
fn test_property_without_table_column_is_rejected() {
    let class = ClassDefinition::new("Box", EntityDefinition::Table(table(PROVIDER, "Box", &[])))
        .with_property(simple("Weight", int_column("Weight")));

    let err = MappingConfiguration::new(vec![class]).unwrap_err();
    assert!(matches!(err, DbError::MappingError(_)));
}

#[test]
fn test_transaction_only_property_needs_no_column() {
    let class = ClassDefinition::new("Box", EntityDefinition::Table(table(PROVIDER, "Box", &[])))
        .with_property(simple("Label", text_column("Label")).transaction_only());

    assert!(MappingConfiguration::new(vec![class]).is_ok());
}

#[test]
fn test_union_view_property_needs_a_column_in_one_table() {
    let company = table(PROVIDER, "Company", &[simple("Name", text_column("Name"))]);
    let person = table(
        PROVIDER,
        "Person",
        &[simple("Name", text_column("Name")), simple("FirstName", text_column("FirstName"))],
    );
    let view = |tables: &[&TableDefinition]| UnionViewDefinition {
        storage_provider_id: PROVIDER.to_string(),
        view_name: EntityName::new("CustomerView"),
        object_id_property: company.object_id_property.clone(),
        union_entities: tables.iter().map(|t| EntityDefinition::Table((*t).clone())).collect(),
    };

    let partial = ClassDefinition::new("Customer", EntityDefinition::UnionView(view(&[&company, &person])))
        .with_property(simple("FirstName", text_column("FirstName")));
    assert!(MappingConfiguration::new(vec![partial]).is_ok());

    let missing = ClassDefinition::new("Customer", EntityDefinition::UnionView(view(&[&company])))
        .with_property(simple("FirstName", text_column("FirstName")));
    assert!(matches!(
        MappingConfiguration::new(vec![missing]).unwrap_err(),
        DbError::MappingError(_)
    ));
}
