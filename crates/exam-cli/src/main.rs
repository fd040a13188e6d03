mod logger;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use exam_layout::{
    AnswerKeySummary, Density, ExamBank, GenerationOptions, LayoutMode, PaperSize, analyze_bank,
    build, calculate_statistics, generate_sets, load_bank,
};
use exam_render::write_set;
use logger::CliLogger;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "exgen", about = "Exam paper generator", version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate question papers, answer papers, booklets and answer keys
    Generate {
        /// Question bank JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "Generated_Papers")]
        output_dir: PathBuf,

        /// Options JSON file; flags below override its values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the effective options to this JSON file
        #[arg(long)]
        save_config: Option<PathBuf>,

        /// Number of sets (1-26)
        #[arg(long)]
        sets: Option<usize>,

        /// Base seed for shuffling
        #[arg(long)]
        seed: Option<u64>,

        /// Keep questions and options in bank order
        #[arg(long)]
        no_shuffle: bool,

        /// Text size
        #[arg(long, value_enum)]
        size: Option<SizeArg>,

        /// Column layout
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,

        /// Page size
        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Title on the first page (max 60 characters)
        #[arg(long)]
        title: Option<String>,

        /// Subtitle on the first page (max 50 characters)
        #[arg(long)]
        subtitle: Option<String>,

        /// Exam title in the running header (max 50 characters)
        #[arg(long)]
        exam_title: Option<String>,

        /// Marks per question
        #[arg(long)]
        marks: Option<u32>,

        /// Omit the name / roll number block
        #[arg(long)]
        no_student_info: bool,

        /// Skip booklet output
        #[arg(long)]
        no_booklet: bool,
    },

    /// Show the structure of a question bank without generating anything
    Analyze {
        /// Question bank JSON file
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SizeArg {
    Small,
    Medium,
    Large,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    OneColumn,
    TwoColumn,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    Letter,
}

impl From<SizeArg> for Density {
    fn from(arg: SizeArg) -> Self {
        match arg {
            SizeArg::Small => Self::Small,
            SizeArg::Medium => Self::Medium,
            SizeArg::Large => Self::Large,
        }
    }
}

impl From<LayoutArg> for LayoutMode {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::OneColumn => Self::OneColumn,
            LayoutArg::TwoColumn => Self::TwoColumn,
        }
    }
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::Letter => Self::Letter,
        }
    }
}

async fn load_checked_bank(input: &Path) -> Result<ExamBank> {
    let sections = load_bank(input)
        .await
        .with_context(|| format!("Failed to load question bank {}", input.display()))?;
    let bank = build(&sections).context("Question bank failed validation")?;
    Ok(bank)
}

fn print_bank_analysis(bank: &ExamBank) {
    let stats = analyze_bank(bank);

    println!("Question Bank Analysis:");
    println!("  Sections: {}", stats.sections.len());
    println!("  Questions in pool: {}", stats.total_questions);
    println!("  Questions per set: {}", stats.emitted_questions);

    println!("Question Kinds:");
    for (kind, count) in &stats.kinds {
        let share = *count as f32 / stats.total_questions.max(1) as f32 * 100.0;
        println!("  {}: {} ({:.1}%)", kind.name(), count, share);
    }

    println!("Sections:");
    for (i, section) in stats.sections.iter().enumerate() {
        println!(
            "  {}. {} ({} of {} questions)",
            i + 1,
            section.name,
            section.required_questions,
            section.pool_size
        );
        if let Some(description) = &section.description {
            println!("     {}", description);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logger = CliLogger::new(cli.verbose);
    logger
        .clone()
        .init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;

    match cli.command {
        Commands::Generate {
            input,
            output_dir,
            config,
            save_config,
            sets,
            seed,
            no_shuffle,
            size,
            layout,
            paper,
            title,
            subtitle,
            exam_title,
            marks,
            no_student_info,
            no_booklet,
        } => {
            let mut options = match &config {
                Some(path) => GenerationOptions::load(path)
                    .await
                    .with_context(|| format!("Failed to load options {}", path.display()))?,
                None => GenerationOptions::default(),
            };

            if let Some(sets) = sets {
                options.num_sets = sets;
            }
            if let Some(seed) = seed {
                options.base_seed = seed;
            }
            if no_shuffle {
                options.shuffle = false;
            }
            if let Some(size) = size {
                options.density = size.into();
            }
            if let Some(layout) = layout {
                options.layout = layout.into();
            }
            if let Some(paper) = paper {
                options.paper_size = paper.into();
            }
            if let Some(title) = title {
                options.title = title;
            }
            if let Some(subtitle) = subtitle {
                options.subtitle = subtitle;
            }
            if let Some(exam_title) = exam_title {
                options.exam_title = exam_title;
            }
            if let Some(marks) = marks {
                options.marks_per_question = marks;
            }
            if no_student_info {
                options.show_student_info = false;
            }
            if no_booklet {
                options.booklet = false;
            }

            options.validate()?;
            if let Some(path) = &save_config {
                options.save(path).await?;
                log::info!("Saved options to {}", path.display());
            }

            let bank = Arc::new(load_checked_bank(&input).await?);
            log::info!(
                "Generating {} set(s) from {} (seed {}, shuffle {}, {} text)",
                options.num_sets,
                input.display(),
                options.base_seed,
                if options.shuffle { "on" } else { "off" },
                options.density.name()
            );

            let sets = generate_sets(Arc::clone(&bank), &options).await?;

            tokio::fs::create_dir_all(&output_dir).await?;
            for set in &sets {
                let outputs = write_set(set, Arc::clone(&bank), &options, &output_dir).await?;
                let stats = calculate_statistics(&bank, set, &options);

                println!("Set {}:", stats.label);
                println!("  Questions: {} ({} marks)", stats.questions, stats.total_marks);
                println!("  Pages: {} (answers: {})", stats.pages, stats.answer_pages);
                if let Some(sheets) = stats.sheets {
                    println!(
                        "  Booklet sheets: {} ({} blank pages added)",
                        sheets, stats.blank_pages_added
                    );
                }
                if stats.overflow_count > 0 {
                    println!("  Oversized questions: {}", stats.overflow_count);
                }
                println!("  → {}", outputs.questions.display());
                println!("  → {}", outputs.answers.display());
                if let Some(booklet) = &outputs.booklet {
                    println!("  → {}", booklet.display());
                }
            }

            let summary = AnswerKeySummary::from_sets(&bank, &sets, options.marks_per_question);
            let csv_path = output_dir.join("answer_keys.csv");
            let json_path = output_dir.join("answer_keys_detailed.json");
            tokio::fs::write(&csv_path, summary.to_csv()?).await?;
            tokio::fs::write(&json_path, summary.to_json()?).await?;
            println!("Answer keys → {}", csv_path.display());
            println!("Detailed answer keys → {}", json_path.display());

            let warnings = logger.warnings();
            if !warnings.is_empty() {
                println!("{} warning(s) during generation:", warnings.len());
                for warning in warnings {
                    println!(
                        "  {} [{}] {}",
                        warning.timestamp.format("%H:%M:%S"),
                        warning.target,
                        warning.message
                    );
                }
            }
        }

        Commands::Analyze { input } => {
            let bank = load_checked_bank(&input).await?;
            print_bank_analysis(&bank);
        }
    }

    Ok(())
}
