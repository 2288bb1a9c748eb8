use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use image::{DynamicImage, RgbImage};
use rollcall::{imaging, Annotator, Config, Error, Recognizer};
use rollcall_core::OnnxEngine;
use std::path::{Path, PathBuf};

/// Enrollment photos for `demo`, relative to the photos directory.
const DEMO_ROSTER: [(&str, &str); 7] = [
    ("amy.jpg", "Amy"),
    ("bernadette.jpg", "Bernadette"),
    ("howard.jpg", "Howard"),
    ("penny.jpg", "Penny"),
    ("raj.jpg", "Raj"),
    ("sheldon.jpg", "Sheldon"),
    ("leonard.jpg", "Leonard"),
];
const DEMO_GROUP_PHOTO: &str = "elenco3.jpg";

#[derive(Parser)]
#[command(name = "rollcall", about = "Enroll faces and find them in group photos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enroll the single face in a photo under a label
    Enroll {
        /// Dataset file, created if missing
        #[arg(short, long, default_value = "faces.json")]
        dataset: PathBuf,
        /// Identity label (labels may repeat)
        #[arg(short, long)]
        label: String,
        image: PathBuf,
    },
    /// Identify the single face in a photo
    Identify {
        #[arg(short, long, default_value = "faces.json")]
        dataset: PathBuf,
        image: PathBuf,
    },
    /// Identify every known face in a photo and draw them
    Classify {
        #[arg(short, long, default_value = "faces.json")]
        dataset: PathBuf,
        image: PathBuf,
        #[arg(short, long, default_value = "faces.jpg")]
        output: PathBuf,
    },
    /// Draw every detected face without identifying it
    Detect {
        image: PathBuf,
        #[arg(short, long, default_value = "faces.jpg")]
        output: PathBuf,
    },
    /// Enroll the demo cast and classify the group photo
    Demo {
        #[arg(short, long, default_value = "photos")]
        photos: PathBuf,
        #[arg(short, long, default_value = "faces.jpg")]
        output: PathBuf,
        /// Also save the enrolled dataset here
        #[arg(short, long)]
        dataset: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let engine = OnnxEngine::load(
        &config.detector_model_path(),
        &config.cnn_model_path(),
        &config.recognizer_model_path(),
    )
    .map_err(Error::EngineInit)?;
    let mut rec = Recognizer::new(engine, config.recognizer_options());

    let result = run(cli.command, &config, &mut rec);
    rec.close();
    result
}

fn run(command: Commands, config: &Config, rec: &mut Recognizer<OnnxEngine>) -> Result<()> {
    match command {
        Commands::Enroll { dataset, label, image } => {
            load_if_present(rec, &dataset)?;
            rec.enroll(&image, &label)
                .with_context(|| format!("enrolling {}", image.display()))?;
            rec.save_dataset(&dataset)?;
            println!("Enrolled {label} ({} entries in {})", rec.dataset().len(), dataset.display());
        }
        Commands::Identify { dataset, image } => {
            rec.load_dataset(&dataset)?;
            rec.rebuild_index();
            match rec.classify_single(&image) {
                Ok(face) => println!(
                    "{} at x={} y={} w={} h={}",
                    face.label, face.rect.x, face.rect.y, face.rect.width, face.rect.height
                ),
                Err(Error::NoMatch) => println!("Unknown face"),
                Err(e) => return Err(e).context(format!("identifying {}", image.display())),
            }
        }
        Commands::Classify { dataset, image, output } => {
            rec.load_dataset(&dataset)?;
            rec.rebuild_index();
            let faces = rec.classify_multiple(&image)?;
            for face in &faces {
                println!("{}", face.label);
            }
            let rendered = annotator(config).draw_faces(&image, &faces)?;
            write_output(&output, rendered)?;
        }
        Commands::Detect { image, output } => {
            let faces = rec.recognize_multiple(&image)?;
            println!("{} face(s) detected", faces.len());
            let rendered = annotator(config).draw_detections(&image, &faces)?;
            write_output(&output, rendered)?;
        }
        Commands::Demo { photos, output, dataset } => {
            for (file, label) in DEMO_ROSTER {
                let path = photos.join(file);
                if let Err(e) = rec.enroll(&path, label) {
                    tracing::error!(error = %e, path = %path.display(), label, "enrollment failed");
                }
            }
            if let Some(dataset) = dataset {
                rec.save_dataset(&dataset)?;
            }
            rec.rebuild_index();

            let group = photos.join(DEMO_GROUP_PHOTO);
            let faces = rec.classify_multiple(&group)?;
            let rendered = annotator(config).draw_faces(&group, &faces)?;
            write_output(&output, rendered)?;
        }
    }

    Ok(())
}

fn load_if_present(rec: &mut Recognizer<OnnxEngine>, dataset: &Path) -> Result<()> {
    match rec.load_dataset(dataset) {
        Ok(_) | Err(Error::FileNotFound(_)) => Ok(()),
        Err(e) => Err(e).context(format!("loading {}", dataset.display())),
    }
}

fn annotator(config: &Config) -> Annotator {
    Annotator::from_font_file(&config.font_path, config.font_size).unwrap_or_else(|e| {
        tracing::warn!(error = %e, path = %config.font_path.display(), "label font unavailable");
        Annotator::new(None, config.font_size)
    })
}

fn write_output(path: &Path, image: RgbImage) -> Result<()> {
    imaging::save_jpeg(path, &DynamicImage::ImageRgb8(image))?;
    println!("Wrote {}", path.display());
    Ok(())
}
