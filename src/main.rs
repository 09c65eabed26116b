use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use ulayout::{NodeId, SimpleLayout, UserLayout, XmlWriterSink, parse_expression};

#[derive(Parser, Debug)]
#[command(version, about = "Query a user layout XML document")]
struct Args {
    /// Identifier reported for the loaded layout
    #[arg(long, default_value = "cli")]
    layout_id: String,

    /// Path to the layout document
    file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the root folder's id
    Root,
    /// Print the ids of the top-level nodes
    Ids,
    /// Print a node's kind and attributes as JSON
    Describe { id: String },
    /// Print a node's parent id
    Parent { id: String },
    /// Print a folder's child ids in order
    Children { id: String },
    /// Print the next sibling's id
    Next { id: String },
    /// Print the previous sibling's id
    Prev { id: String },
    /// Print the id of the first channel with this functional name
    Find { fname: String },
    /// Evaluate an XPath expression and print its string value
    Xpath { expression: String },
    /// Write the layout, or the subtree under ID, as XML
    Export { id: Option<String> },
}

fn print_ids(out: &mut impl Write, ids: impl IntoIterator<Item = NodeId>) -> io::Result<()> {
    for id in ids {
        writeln!(out, "{}", id)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    log::debug!("Loading layout from {}", args.file.display());
    let xml = fs::read_to_string(&args.file)?;
    let layout = SimpleLayout::from_xml(args.layout_id, &xml)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.command {
        Command::Root => print_ids(&mut out, layout.root_id())?,
        Command::Ids => print_ids(&mut out, layout.node_ids())?,
        Command::Describe { id } => {
            let description = layout.node_description(&id)?;
            serde_json::to_writer_pretty(&mut out, &description)?;
            writeln!(out)?;
        }
        Command::Parent { id } => print_ids(&mut out, layout.parent_id(&id)?)?,
        Command::Children { id } => print_ids(&mut out, layout.child_ids(&id)?)?,
        Command::Next { id } => print_ids(&mut out, layout.next_sibling_id(&id)?)?,
        Command::Prev { id } => print_ids(&mut out, layout.previous_sibling_id(&id)?)?,
        Command::Find { fname } => print_ids(&mut out, layout.node_id_for_fname(&fname)?)?,
        Command::Xpath { expression } => {
            let expression = parse_expression(&expression)?;
            writeln!(out, "{}", layout.find_node_id(&expression)?)?;
        }
        Command::Export { id } => {
            let mut sink = XmlWriterSink::new(&mut out);
            match id {
                Some(id) => layout.write_node_to(&id, &mut sink)?,
                None => layout.write_to(&mut sink)?,
            }
            drop(sink);
            writeln!(out)?;
        }
    }
    Ok(())
}
