use clap::Parser;

use tally_core::labels::{ClassLabels, ProblemType};
use tally_core::run::RunConfig;

mod args;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = args::Args::parse();

    if let Err(err) = execute(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn execute(args: args::Args) -> anyhow::Result<()> {
    match args.command {
        args::Command::Score(score) => {
            // Problem type follows the label flags: a positive/negative pair
            // means binary, a label set means multiclass, neither means
            // regression. Anomaly runs come through the library API.
            let (problem_type, class_labels) =
                match (score.positive_class_label, score.negative_class_label) {
                    (Some(positive), Some(negative)) => (
                        ProblemType::Binary,
                        Some(ClassLabels::binary(positive, negative)?),
                    ),
                    _ => match score.class_labels {
                        Some(labels) => (
                            ProblemType::Multiclass,
                            Some(ClassLabels::multiclass(labels)?),
                        ),
                        None => (ProblemType::Regression, None),
                    },
                };

            let mut config = RunConfig::new(score.code_dir, score.input);
            config.output = score.output;
            config.problem_type = problem_type;
            config.language = score.language.map(Into::into);
            config.class_labels = class_labels;

            tally_core::run(&config)?;
            Ok(())
        }
    }
}
