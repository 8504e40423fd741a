use clap::{App, Arg, ArgMatches};

use planarity::graph::io::load_graph;
use planarity::sefe::bicolored::BicoloredGraph;
use planarity::{embedder, sefe};

fn main() {
    let matches = App::new("planarity")
        .version("0.3.0")
        .about("Auslander-Parter planarity testing, embedding and SEFE")
        .subcommand(
            App::new("embed")
                .about("Compute a combinatorial embedding of a graph, if planar")
                .arg(Arg::new("GRAPH").help("Input graph file").required(true)),
        )
        .subcommand(
            App::new("sefe")
                .about("Decide simultaneous embeddability of two graphs with shared edges fixed")
                .arg(Arg::new("FIRST").help("First input graph file").required(true))
                .arg(
                    Arg::new("SECOND")
                        .help("Second input graph file")
                        .required(true),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("embed", matches)) => embed_command(matches),
        Some(("sefe", matches)) => sefe_command(matches),
        _ => {
            println!("No valid command specified. Type 'planarity help' for a list of valid commands.");
        }
    }
}

fn embed_command(matches: &ArgMatches) {
    let path = matches.value_of("GRAPH").unwrap();
    let graph = load_graph(path).unwrap_or_else(|e| fail(&format!("{}", e)));
    match embedder::embed(&graph) {
        Ok(Some(embedding)) => {
            println!("embedding:");
            print!("{}", embedding);
        }
        Ok(None) => println!("not planar"),
        Err(e) => fail(&format!("{}", e)),
    }
}

fn sefe_command(matches: &ArgMatches) {
    let first = matches.value_of("FIRST").unwrap();
    let second = matches.value_of("SECOND").unwrap();
    let red = load_graph(first).unwrap_or_else(|e| fail(&format!("{}", e)));
    let blue = load_graph(second).unwrap_or_else(|e| fail(&format!("{}", e)));
    let bicolored =
        BicoloredGraph::from_pair(&red, &blue).unwrap_or_else(|e| fail(&format!("{}", e)));
    match sefe::embed(&bicolored) {
        Ok(Some(embedding)) => {
            println!("simultaneous embedding:");
            print!("{}", embedding);
        }
        Ok(None) => println!("no simultaneous embedding"),
        Err(e) => fail(&format!("{}", e)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
