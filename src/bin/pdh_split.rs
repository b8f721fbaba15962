use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use pdh_reader::export::{self, DataFormat, MetadataFormat};
use pdh_reader::{PdhReader, ReaderConfig};

#[derive(Parser)]
#[command(
    name = "pdh_split",
    version,
    about = "Split .pdh files into a data table and an XML metadata document"
)]
struct Cli {
    /// JSON reader configuration (data_dir, pattern, layout).
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Directory to scan; overrides the configured data_dir.
    #[arg(long, value_name = "DIR", global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the logical names of the available files.
    List,

    /// Write the data and metadata artifacts of each file.
    Split {
        /// Files to split (default: all).
        names: Vec<String>,

        /// Output directory.
        #[arg(long, value_name = "DIR")]
        out: PathBuf,

        #[arg(long, value_enum, default_value = "csv")]
        data_format: DataFormatArg,

        #[arg(long, value_enum, default_value = "xml")]
        metadata_format: MetadataFormatArg,
    },

    /// Print a short summary of one file.
    Show {
        name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DataFormatArg {
    Csv,
    Parquet,
}

impl From<DataFormatArg> for DataFormat {
    fn from(arg: DataFormatArg) -> Self {
        match arg {
            DataFormatArg::Csv => DataFormat::Csv,
            DataFormatArg::Parquet => DataFormat::Parquet,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MetadataFormatArg {
    Xml,
    Json,
}

impl From<MetadataFormatArg> for MetadataFormat {
    fn from(arg: MetadataFormatArg) -> Self {
        match arg {
            MetadataFormatArg::Xml => MetadataFormat::Xml,
            MetadataFormatArg::Json => MetadataFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ReaderConfig::from_json_file(path)?,
        None => ReaderConfig::default(),
    };
    if let Some(dir) = cli.dir {
        config.data_dir = dir;
    }

    let reader = PdhReader::with_config(&config)
        .with_context(|| format!("indexing {}", config.data_dir.display()))?;

    match cli.command {
        Command::List => {
            for name in reader.available_files() {
                println!("{name}");
            }
        }
        Command::Split {
            names,
            out,
            data_format,
            metadata_format,
        } => {
            let names = if names.is_empty() {
                reader.available_files().into_iter().collect()
            } else {
                names
            };
            if names.is_empty() {
                bail!("no files to split in {}", config.data_dir.display());
            }
            std::fs::create_dir_all(&out).with_context(|| format!("creating {}", out.display()))?;
            for name in &names {
                split_one(&reader, name, &out, data_format.into(), metadata_format.into())
                    .with_context(|| format!("splitting '{name}'"))?;
            }
            log::info!("Split {} file(s) into {}", names.len(), out.display());
        }
        Command::Show { name } => {
            let table = reader.get_data(&name)?;
            let metadata = reader.get_metadata(&name)?;
            println!("{}", reader.path_of(&name)?.display());
            println!("  rows:     {}", table.len());
            if let Some((lo, hi)) = table.q_range() {
                println!("  q range:  {lo:e} .. {hi:e}");
            }
            println!("  metadata: {} ({} elements)", metadata.root, metadata.element_count());
        }
    }

    Ok(())
}

fn split_one(
    reader: &PdhReader,
    name: &str,
    out: &Path,
    data_format: DataFormat,
    metadata_format: MetadataFormat,
) -> Result<()> {
    let table = reader.get_data(name)?;
    let metadata = reader.get_metadata(name)?;

    let data_path = out.join(format!("{name}.{}", data_format.extension()));
    let metadata_path = out.join(format!("{name}.{}", metadata_format.extension()));
    export::write_data(&table, data_format, &data_path)?;
    export::write_metadata(&metadata, metadata_format, &metadata_path)?;

    log::info!(
        "{name}: {} rows → {}, metadata → {}",
        table.len(),
        data_path.display(),
        metadata_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_formats_parse_and_map() {
        let cli = Cli::try_parse_from([
            "pdh_split",
            "split",
            "--out",
            "out",
            "--data-format",
            "parquet",
            "--metadata-format",
            "json",
            "lysozyme",
        ])
        .unwrap();
        let Command::Split { names, data_format, metadata_format, .. } = cli.command else {
            panic!("expected split");
        };
        assert_eq!(names, vec!["lysozyme".to_string()]);
        assert_eq!(DataFormat::from(data_format).extension(), "parquet");
        assert_eq!(MetadataFormat::from(metadata_format).extension(), "json");
    }

    #[test]
    fn split_formats_default_to_csv_and_xml() {
        let cli = Cli::try_parse_from(["pdh_split", "split", "--out", "out"]).unwrap();
        let Command::Split { data_format, metadata_format, .. } = cli.command else {
            panic!("expected split");
        };
        assert_eq!(DataFormat::from(data_format), DataFormat::Csv);
        assert_eq!(MetadataFormat::from(metadata_format), MetadataFormat::Xml);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = Cli::try_parse_from(["pdh_split", "split", "--out", "o", "--data-format", "xlsx"]);
        assert!(result.is_err());
    }
}
