use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use rdbprovider::mapping::{RelationEndPointDefinition, ResolvedEntity, SortExpressionDefinition};
use rdbprovider::{
    DialectKind, DryRunExecutionContext, MappingConfiguration, ObjectId, ProviderConfig,
    StorageProvider, StorageProviderCommand,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rdbprovider-tool")]
#[command(about = "Shows the commands the storage provider factories would issue")]
struct Cli {
    // Not global: clap rejects arguments that are both global and required.
    /// Mapping document (JSON), given before the subcommand
    #[arg(long)]
    mapping: PathBuf,

    /// Provider configuration (JSON); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the dialect of the configuration
    #[arg(long, global = true)]
    dialect: Option<DialectArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    SqlServer,
    Ansi,
}

impl From<DialectArg> for DialectKind {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::SqlServer => DialectKind::SqlServer,
            DialectArg::Ansi => DialectKind::Ansi,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    Explain {
        #[command(subcommand)]
        target: ExplainTarget,
    },
}

#[derive(Subcommand)]
enum ExplainTarget {
    /// Data container lookup by id, e.g. `--ids Order:1,OrderItem:7`
    Lookup {
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,
    },
    /// Timestamp lookup by id
    Timestamps {
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,
    },
    /// Objects referencing `--related` through `--class`.`--property`
    Relation {
        #[arg(long)]
        class: String,
        #[arg(long)]
        property: String,
        #[arg(long)]
        related: String,
        /// e.g. "Position desc, Name"
        #[arg(long)]
        sort: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let provider = load_provider(&cli.mapping, cli.config.as_deref(), cli.dialect)?;

    match cli.command {
        Command::Explain { target } => explain(&provider, target),
    }
}

fn load_provider(
    mapping_path: &Path,
    config: Option<&Path>,
    dialect: Option<DialectArg>,
) -> Result<StorageProvider> {
    let mapping = MappingConfiguration::load(mapping_path)
        .with_context(|| format!("Failed to load mapping '{}'", mapping_path.display()))?;

    let mut config = match config {
        Some(path) => ProviderConfig::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => ProviderConfig::default(),
    };
    if let Some(dialect) = dialect {
        config = config.dialect(dialect.into());
    }

    StorageProvider::new(config, mapping).context("Invalid provider configuration")
}

fn explain(provider: &StorageProvider, target: ExplainTarget) -> Result<()> {
    let factories = provider.factories();
    let mut context = DryRunExecutionContext::new();

    match target {
        ExplainTarget::Lookup { ids } => {
            let ids = parse_ids(provider.mapping(), &ids)?;
            let command = factories.lookup().create_for_sorted_multi_id_lookup(&ids)?;
            command.execute(&mut context)?;
        }
        ExplainTarget::Timestamps { ids } => {
            let ids = parse_ids(provider.mapping(), &ids)?;
            let command = factories.lookup().create_for_multi_timestamp_lookup(&ids)?;
            command.execute(&mut context)?;
        }
        ExplainTarget::Relation {
            class,
            property,
            related,
            sort,
        } => {
            let related = parse_id(provider.mapping(), &related)?;
            let sort = sort
                .as_deref()
                .map(SortExpressionDefinition::parse)
                .transpose()?;
            let end_point = RelationEndPointDefinition::new(class, property);
            let command = factories.relation_lookup().create_for_relation_lookup(
                &end_point,
                &related,
                sort.as_ref(),
            )?;
            command.execute(&mut context)?;
        }
    }

    let commands = context.into_commands();
    if commands.is_empty() {
        println!("-- no command is issued");
    }
    for (idx, command) in commands.iter().enumerate() {
        println!("-- command {}", idx + 1);
        println!("{}", command);
    }
    Ok(())
}

fn parse_ids(mapping: &MappingConfiguration, ids: &[String]) -> Result<Vec<ObjectId>> {
    ids.iter().map(|id| parse_id(mapping, id)).collect()
}

/// Parses `Class:value`, typing the value like the class's ID column.
fn parse_id(mapping: &MappingConfiguration, text: &str) -> Result<ObjectId> {
    let (class_id, value) = text
        .split_once(':')
        .ok_or_else(|| anyhow!("Object id '{}' must look like Class:value", text))?;
    let class = mapping.class(class_id.trim())?;

    let id_column = match class.storage_entity.resolve() {
        ResolvedEntity::Table(table) => &table.object_id_property.value,
        ResolvedEntity::UnionView(view) => &view.object_id_property.value,
        ResolvedEntity::Empty(_) => &mapping.infrastructure().object_id_property.value,
    };
    let value = id_column
        .storage_type
        .data_type
        .parse(value.trim())
        .with_context(|| format!("Invalid id value in '{}'", text))?;

    Ok(ObjectId::new(class.id.clone(), value))
}
