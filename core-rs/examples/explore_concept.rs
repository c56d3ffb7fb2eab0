/// Example: Walk a concept and everything one click away from it
///
/// Opens a concept in a fresh session, prints its sections, then opens every
/// drill-down target through the same session so repeated targets hit the cache.
///
/// Usage:
///   cargo run --example explore_concept ifc:IfcWall
///   cargo run --example explore_concept ifc:IfcWall express:Entity

use ifcsv_core::schema::{ConceptKind, ConceptResolver, Selection, Session};
use ifcsv_core::{SchemaStore, ViewerConfig};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example explore_concept <IRI> [express:Kind]");
        std::process::exit(1);
    }

    let config = ViewerConfig::load_from_dir(env::current_dir()?)?;
    let store = SchemaStore::open(&config.dataset)?.with_namespaces(&config.namespaces);
    let resolver = ConceptResolver::new(&store);
    let iri = store.resolve(&args[1])?;

    // Use the given kind, else whatever the concept declares first
    let kind = match args.get(2) {
        Some(tag) => tag.parse::<ConceptKind>()?,
        None => match resolver.kinds_of(iri.as_str())?.into_iter().find(ConceptKind::has_detail) {
            Some(kind) => kind,
            None => {
                eprintln!("{} declares no concept kind with a detail view", args[1]);
                std::process::exit(1);
            }
        },
    };

    let mut session = Session::new();
    let Some(detail) = session.open(&resolver, Selection::new(kind, iri.as_str()))? else {
        println!("No detail available for {} as {}", args[1], kind);
        return Ok(());
    };

    println!("═══════════════════════════════════════════");
    println!("{} ({})", detail.label, detail.express_type());
    println!("{}", detail.doc_url());
    println!("═══════════════════════════════════════════");
    println!("{}", serde_json::to_string_pretty(&detail.body)?);

    let targets = detail.drill_down();
    println!("\n{} drill-down targets", targets.len());
    for target in targets {
        match session.open(&resolver, target.clone())? {
            Some(linked) => println!("  {:<28} {}", linked.express_type(), linked.label),
            None => println!("  {:<28} {}", target.kind, target.iri),
        }
    }

    let (hits, misses) = session.concepts().stats();
    println!("\ncache: {} hits, {} misses", hits, misses);

    Ok(())
}
