//! pdfseg CLI - drives the paragraph extraction pipeline against a data root

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use pdfseg::{
    extract_record, FontSizeClassifier, ResultStore, Stage, StagingQueue,
};

#[derive(Parser)]
#[command(name = "pdfseg")]
#[command(version)]
#[command(about = "Stage, segment, and deliver PDF paragraph extractions", long_about = None)]
struct Cli {
    /// Data root holding staging directories, XML artifacts, and the store
    #[arg(long, global = true, env = "PDFSEG_ROOT", default_value = "./data")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enqueue a document for conversion (the to_extract stage)
    Upload {
        /// Document file to stage
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Tenant namespace
        #[arg(short, long)]
        tenant: Option<String>,

        /// Name to stage the file under (defaults to the file's own name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Enqueue a document for segmentation (the to_segment stage)
    Stage {
        /// Document file to stage
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Tenant namespace
        #[arg(short, long)]
        tenant: Option<String>,

        /// Name to stage the file under (defaults to the file's own name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Run converter XML through the pipeline and store the record
    Process {
        /// Converter XML output file
        #[arg(value_name = "XML")]
        xml: PathBuf,

        /// Tenant namespace
        #[arg(short, long)]
        tenant: Option<String>,

        /// Document name to store the record under (defaults to <stem>.pdf)
        #[arg(long)]
        name: Option<String>,
    },

    /// Take a stored paragraph record (destructive; prints JSON)
    Paragraphs {
        /// Tenant namespace
        #[arg(value_name = "TENANT")]
        tenant: String,

        /// Document file name
        #[arg(value_name = "FILE_NAME")]
        file_name: String,
    },

    /// Take the intermediate XML artifact (destructive; prints the XML)
    Xml {
        /// Tenant namespace
        #[arg(value_name = "TENANT")]
        tenant: String,

        /// PDF file name the artifact belongs to
        #[arg(value_name = "FILE_NAME")]
        file_name: String,
    },

    /// List files waiting in a staging directory
    Pending {
        /// Stage to inspect: to_extract or to_segment
        #[arg(value_name = "STAGE")]
        stage: String,

        /// Tenant namespace
        #[arg(short, long)]
        tenant: Option<String>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let root = cli.root;

    let result = match cli.command {
        Commands::Upload { file, tenant, name } => {
            cmd_enqueue(&root, Stage::ToExtract, &file, tenant.as_deref(), name)
        }
        Commands::Stage { file, tenant, name } => {
            cmd_enqueue(&root, Stage::ToSegment, &file, tenant.as_deref(), name)
        }
        Commands::Process { xml, tenant, name } => {
            cmd_process(&root, &xml, tenant.as_deref(), name)
        }
        Commands::Paragraphs { tenant, file_name } => {
            cmd_paragraphs(&root, &tenant, &file_name)
        }
        Commands::Xml { tenant, file_name } => cmd_xml(&root, &tenant, &file_name),
        Commands::Pending { stage, tenant } => cmd_pending(&root, &stage, tenant.as_deref()),
    };

    if let Err(e) = result {
        if e.is_not_found() {
            eprintln!("{}: {}", "Not found".yellow().bold(), e);
        } else {
            eprintln!("{}: {}", "Error".red().bold(), e);
        }
        std::process::exit(1);
    }
}

fn cmd_enqueue(
    root: &PathBuf,
    stage: Stage,
    file: &PathBuf,
    tenant: Option<&str>,
    name: Option<String>,
) -> pdfseg::Result<()> {
    let bytes = fs::read(file)?;
    let name = staged_name(file, name);

    let queue = StagingQueue::new(root);
    let path = queue.enqueue(stage, tenant, &name, &bytes)?;
    println!("{} {}", "Staged".green().bold(), path.display());
    Ok(())
}

fn cmd_process(
    root: &PathBuf,
    xml_file: &PathBuf,
    tenant: Option<&str>,
    name: Option<String>,
) -> pdfseg::Result<()> {
    let xml = fs::read_to_string(xml_file)?;
    let name = name.unwrap_or_else(|| {
        let stem = xml_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        format!("{stem}.pdf")
    });

    let record = extract_record(tenant, &name, &xml, &FontSizeClassifier)?;
    let store = open_store(root)?;
    store.put(&record)?;

    println!(
        "{} {} paragraph(s) for ({}, {})",
        "Stored".green().bold(),
        record.paragraphs.len(),
        record.tenant,
        record.file_name
    );
    Ok(())
}

fn cmd_paragraphs(root: &PathBuf, tenant: &str, file_name: &str) -> pdfseg::Result<()> {
    let store = open_store(root)?;
    let record = store.take(Some(tenant), file_name)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn cmd_xml(root: &PathBuf, tenant: &str, file_name: &str) -> pdfseg::Result<()> {
    let store = open_store(root)?;
    let xml = store.take_xml(Some(tenant), file_name)?;
    println!("{xml}");
    Ok(())
}

fn cmd_pending(root: &PathBuf, stage: &str, tenant: Option<&str>) -> pdfseg::Result<()> {
    let stage = match stage {
        "to_extract" => Stage::ToExtract,
        "to_segment" => Stage::ToSegment,
        other => return Err(pdfseg::Error::InvalidName(other.to_string())),
    };

    let queue = StagingQueue::new(root);
    let names = queue.pending(stage, tenant)?;
    if names.is_empty() {
        println!("{}", "(empty)".dimmed());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn open_store(root: &PathBuf) -> pdfseg::Result<ResultStore> {
    ResultStore::open(&root.join("extractions.db"), root.join("xml"))
}

fn staged_name(file: &PathBuf, name: Option<String>) -> String {
    name.unwrap_or_else(|| {
        file.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf")
            .to_string()
    })
}
