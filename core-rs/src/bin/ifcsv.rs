//! ifcsv - IFC schema viewer CLI
//!
//! Loads the configured dataset once and prints one view per invocation.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::Level;

use ifcsv_core::graph::{HierarchyExtractor, NeighborhoodBuilder};
use ifcsv_core::schema::{CollectionKind, ConceptBody, ConceptDetail, ConceptResolver, NodeMetadata, SchemaNavigator};
use ifcsv_core::status::{self, DatasetStatus, PropertyInventory, SubgraphSort};
use ifcsv_core::{SchemaStore, ViewerConfig};

#[derive(Parser)]
#[command(name = "ifcsv")]
#[command(version = ifcsv_core::VERSION)]
#[command(about = "IFC4.3 schema viewer", long_about = None)]
struct Cli {
    /// Directory holding viewer.yaml and the dataset paths it names
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Graph and triple counts
    Stats,
    /// Triple count per named subgraph
    Subgraphs {
        #[arg(long)]
        filter: Option<String>,
        /// name, size-desc or size-asc
        #[arg(long, default_value = "name")]
        sort: SubgraphSort,
    },
    /// Bound namespace prefixes
    Namespaces {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Every named class
    Classes {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Declared object, datatype and annotation properties
    Properties {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Whole-ontology hierarchy as graph-widget options
    Hierarchy {
        #[arg(value_enum)]
        of: HierarchyOf,
        /// Show node labels in the rendered chart
        #[arg(long)]
        labels: bool,
    },
    /// Direct sub/superclasses of a class
    Class { iri: String },
    /// Sub/super properties, inverses, domain and range of a property
    Property { iri: String },
    /// Every non-literal neighbor of an individual
    Instance { iri: String },
    /// Literal annotations and OWL characteristics of a node
    Metadata { iri: String },
    /// Detail record of a concept, e.g. `concept express:Entity ifc:IfcWall`
    Concept { tag: String, iri: String },
    /// Members of a concept collection
    Collection {
        kind: CollectionKind,
        #[arg(long)]
        filter: Option<String>,
    },
    /// Data schemas of a scheme, conceptual groups of a layer, or concepts of a group
    Groups {
        /// Layer whose conceptual groups to list
        layer: Option<String>,
        #[arg(long, default_value = "ifc:IFC4X3")]
        scheme: String,
        /// Group whose concepts to list
        #[arg(long, conflicts_with = "layer")]
        concepts: Option<String>,
    },
    /// Run a SPARQL query over the whole dataset
    Query { sparql: String },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HierarchyOf {
    Classes,
    Properties,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let header = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<w$}", h, w = *w))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header.bold().cyan());
    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line);
    }
    println!("\n{} rows", rows.len());
}

fn print_detail(detail: &ConceptDetail) {
    println!("{} {}", detail.label.bold(), format!("({})", detail.express_type()).dimmed());
    println!("{}", detail.doc_url().underline());
    let definitions = detail.definitions_markdown();
    if !definitions.is_empty() {
        println!("\n{}", definitions);
    }

    match &detail.body {
        ConceptBody::Entity(entity) => {
            let refs = |refs: &[ifcsv_core::schema::ConceptRef]| {
                refs.iter().map(|r| vec![r.name.clone(), r.iri.clone()]).collect::<Vec<_>>()
            };
            println!("\n{}", "Super entities".green().bold());
            print_table(&["Name", "IRI"], &refs(&entity.super_entities));
            println!("\n{}", "Sub entities".green().bold());
            print_table(&["Name", "IRI"], &refs(&entity.sub_entities));
            let attributes = |attrs: &[ifcsv_core::schema::Attribute]| {
                attrs
                    .iter()
                    .map(|a| {
                        vec![
                            a.index.map(|i| i.to_string()).unwrap_or_default(),
                            a.name.clone(),
                            a.optional_flag().to_string(),
                            a.cardinality.clone(),
                            a.range.clone(),
                            a.express_type.clone(),
                        ]
                    })
                    .collect::<Vec<_>>()
            };
            let headers = ["#", "Attribute", "Optional", "Cardinality", "Range", "Type"];
            println!("\n{}", "Direct attributes".green().bold());
            print_table(&headers, &attributes(&entity.direct_attributes));
            println!("\n{}", "Inverse attributes".green().bold());
            print_table(&headers, &attributes(&entity.inverse_attributes));
            println!("\n{}", "Property set templates".green().bold());
            let rows: Vec<_> = entity
                .pset_templates
                .iter()
                .map(|p| vec![p.name.clone(), p.express_type.clone()])
                .collect();
            print_table(&["Name", "Type"], &rows);
        }
        ConceptBody::Enum(detail) => {
            let rows: Vec<_> = detail.members.iter().map(|m| vec![m.name.clone(), m.description.clone()]).collect();
            print_table(&["Member", "Description"], &rows);
        }
        ConceptBody::PropertyEnumeration(detail) => {
            let rows: Vec<_> = detail.members.iter().map(|m| vec![m.name.clone(), m.description.clone()]).collect();
            print_table(&["Member", "Description"], &rows);
            println!("\n{}", "Used by".green().bold());
            let rows: Vec<_> = detail
                .pset_templates
                .iter()
                .map(|p| vec![p.pset_name.clone(), p.property_name.clone()])
                .collect();
            print_table(&["Template", "Property"], &rows);
        }
        ConceptBody::Select(detail) => {
            let rows: Vec<_> = detail
                .members
                .iter()
                .map(|m| vec![m.name.clone(), m.express_type.clone(), m.iri.clone()])
                .collect();
            print_table(&["Member", "Type", "IRI"], &rows);
        }
        ConceptBody::DerivedType(detail) => {
            if let Some(display) = detail.derived_from_display() {
                println!("\nDerived from {}", display);
            }
        }
        ConceptBody::PropertySetTemplate(detail) | ConceptBody::QuantitySetTemplate(detail) => {
            let rows: Vec<_> = detail
                .properties
                .iter()
                .map(|p| {
                    vec![
                        p.name.clone(),
                        p.property_type.clone().unwrap_or_default(),
                        p.data_type.clone(),
                        p.express_type.clone(),
                    ]
                })
                .collect();
            print_table(&["Property", "Kind", "Data type", "Type"], &rows);
            println!("\n{} {}", "Applicable entities:".green().bold(), detail.applicable_entities.len());
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ViewerConfig::load_from_dir(&cli.root)
        .with_context(|| format!("Failed to load configuration from {}", cli.root.display()))?;
    let store = SchemaStore::open(&config.dataset)
        .context("IFC schema dataset not found, check dataset paths in viewer.yaml")?
        .with_namespaces(&config.namespaces);
    let json = cli.format == Format::Json;

    match cli.command {
        Commands::Stats => {
            let stats = DatasetStatus::collect(&store, &config.schema)?;
            if json {
                print_json(&stats)?;
            } else {
                print_table(
                    &["Metric", "Value"],
                    &[
                        vec!["Subgraphs".into(), stats.graph_count.to_string()],
                        vec!["Triples".into(), stats.triple_count.to_string()],
                        vec!["Common-concept subgraphs".into(), stats.common_concept_graphs.to_string()],
                        vec!["Common-concept triples".into(), stats.common_concept_triples.to_string()],
                        vec!["Schema graph triples".into(), stats.schema_graph_triples.to_string()],
                        vec!["Ontology triples".into(), stats.ontology_triples.to_string()],
                    ],
                );
            }
        }
        Commands::Subgraphs { filter, sort } => {
            let stats = status::subgraph_stats(&store, &config.schema, filter.as_deref(), sort)?;
            if json {
                print_json(&stats)?;
            } else {
                let rows: Vec<_> = stats.iter().map(|s| vec![s.name.clone(), s.triples.to_string()]).collect();
                print_table(&["Subgraph", "Triples"], &rows);
            }
        }
        Commands::Namespaces { filter } => {
            let entries = status::namespaces(&store, filter.as_deref());
            if json {
                print_json(&entries)?;
            } else {
                let rows: Vec<_> = entries.iter().map(|e| vec![e.prefix.clone(), e.namespace.clone()]).collect();
                print_table(&["Prefix", "Namespace"], &rows);
            }
        }
        Commands::Classes { filter } => {
            let keyword = filter.map(|f| f.to_lowercase());
            let rows: Vec<Vec<String>> = status::class_inventory(&store)?
                .iter()
                .map(|c| vec![store.label(c.as_ref()), c.as_str().to_string()])
                .filter(|row| match &keyword {
                    Some(k) => row.iter().any(|cell| cell.to_lowercase().contains(k)),
                    None => true,
                })
                .collect();
            if json {
                print_json(&rows)?;
            } else {
                print_table(&["Class", "IRI"], &rows);
            }
        }
        Commands::Properties { filter } => {
            let entries = PropertyInventory::collect(&store)?.entries(&store, filter.as_deref());
            if json {
                print_json(&entries)?;
            } else {
                let rows: Vec<_> = entries
                    .iter()
                    .map(|e| vec![e.namespace.clone(), e.label.clone(), e.property_type.as_str().to_string()])
                    .collect();
                print_table(&["Namespace", "Property", "Type"], &rows);
            }
        }
        Commands::Hierarchy { of, labels } => {
            let extractor = HierarchyExtractor::new(&store, config.rendering);
            let hierarchy = match of {
                HierarchyOf::Classes => extractor.class_hierarchy()?,
                HierarchyOf::Properties => extractor.property_hierarchy()?,
            };
            print_json(&hierarchy.to_options(labels))?;
        }
        Commands::Class { iri } => {
            let node = store.resolve(&iri)?;
            let hood = NeighborhoodBuilder::new(&store).class(node.as_ref())?;
            print_json(&hood.to_options(true))?;
        }
        Commands::Property { iri } => {
            let node = store.resolve(&iri)?;
            let hood = NeighborhoodBuilder::new(&store).property(node.as_ref())?;
            print_json(&hood.to_options(true))?;
        }
        Commands::Instance { iri } => {
            let node = store.resolve(&iri)?;
            let hood = NeighborhoodBuilder::new(&store).instance(node.as_ref())?;
            print_json(&hood.to_options(true))?;
        }
        Commands::Metadata { iri } => {
            let node = store.resolve(&iri)?;
            let metadata = NodeMetadata::collect(&store, node.as_ref())?;
            if json {
                print_json(&metadata)?;
            } else {
                println!("{}\n", metadata.label.bold());
                print!("{}", metadata.to_markdown());
            }
        }
        Commands::Concept { tag, iri } => {
            let node = store.resolve(&iri)?;
            let resolver = ConceptResolver::new(&store);
            match resolver.resolve_tag(&tag, node.as_str())? {
                Some(detail) if json => print_json(&detail)?,
                Some(detail) => print_detail(&detail),
                None => println!("No detail available for {} as {}", iri, tag),
            }
        }
        Commands::Collection { kind, filter } => {
            let collection = ifcsv_core::schema::Collection::load(&store, kind)?;
            let members = collection.filter(filter.as_deref().unwrap_or_default());
            if json {
                print_json(&members)?;
            } else {
                let rows: Vec<_> = members
                    .iter()
                    .map(|m| vec![m.name.clone(), m.express_type.clone(), m.iri.clone()])
                    .collect();
                print_table(&["Name", "Type", "IRI"], &rows);
            }
        }
        Commands::Groups { layer, scheme, concepts } => {
            let navigator = SchemaNavigator::new(&store, &config.schema)?;
            if let Some(group) = concepts {
                let concepts = navigator.concepts(store.resolve(&group)?.as_str())?;
                if json {
                    print_json(&concepts)?;
                } else {
                    let rows: Vec<_> = concepts
                        .iter()
                        .map(|c| vec![c.express_type.clone(), c.name.clone(), c.iri.clone()])
                        .collect();
                    print_table(&["Type", "Concept", "IRI"], &rows);
                }
            } else if let Some(layer) = layer {
                let groups = navigator.conceptual_groups(store.resolve(&layer)?.as_str())?;
                if json {
                    print_json(&groups)?;
                } else {
                    let rows: Vec<_> = groups.iter().map(|g| vec![g.name.clone(), g.iri.clone()]).collect();
                    print_table(&["Group", "IRI"], &rows);
                }
            } else {
                let schemas = navigator.data_schemas(store.resolve(&scheme)?.as_str())?;
                if json {
                    print_json(&schemas)?;
                } else {
                    let rows: Vec<_> = schemas.iter().map(|s| vec![s.name.clone(), s.iri.clone()]).collect();
                    print_table(&["Data schema", "IRI"], &rows);
                }
            }
        }
        Commands::Query { sparql } => {
            if sparql.trim().is_empty() {
                bail!("Empty query");
            }
            let rows = store.query_sparql(&sparql)?;
            if json {
                print_json(&rows)?;
            } else {
                let mut headers: Vec<String> = rows.iter().flat_map(|r| r.keys().cloned()).collect();
                headers.sort();
                headers.dedup();
                let table: Vec<Vec<String>> = rows
                    .iter()
                    .map(|r| headers.iter().map(|h| r.get(h).cloned().unwrap_or_default()).collect())
                    .collect();
                let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
                print_table(&header_refs, &table);
            }
        }
    }

    Ok(())
}
