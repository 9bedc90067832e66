use crate::infra::parse_rating_pair;
use clap::Args;
use wheel_of_life::assessment::{score, AssessmentInput, Category, Rating, ScoredResult};
use wheel_of_life::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Satisfaction rating as CATEGORY=N (repeatable, N in 1-10)
    #[arg(short = 's', long = "satisfaction", value_parser = parse_rating_pair)]
    pub(crate) satisfaction: Vec<(Category, Rating)>,
    /// Motivation rating as CATEGORY=N (repeatable, N in 1-10)
    #[arg(short = 'm', long = "motivation", value_parser = parse_rating_pair)]
    pub(crate) motivation: Vec<(Category, Rating)>,
    /// Print the full scored result as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

impl ScoreArgs {
    fn assessment(&self) -> AssessmentInput {
        AssessmentInput::new(
            self.satisfaction.iter().copied().collect(),
            self.motivation.iter().copied().collect(),
        )
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let result = score(&args.assessment());

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Scored result unavailable: {err}"),
        }
    } else {
        print!("{}", render_ranking(&result));
    }

    Ok(())
}

fn render_ranking(result: &ScoredResult) -> String {
    let mut output = String::from("Wheel of Life priorities\n");
    output.push_str(&format!(
        "{:<5} {:<26} {:>4} {:>4} {:>4} {:>8}\n",
        "Rank", "Category", "Sat", "Mot", "Imp", "Priority"
    ));

    for (rank, entry) in result.ranked().iter().enumerate() {
        output.push_str(&format!(
            "{:<5} {:<26} {:>4} {:>4} {:>4} {:>8}\n",
            rank + 1,
            entry.label,
            entry.satisfaction,
            entry.motivation,
            entry.improvement,
            entry.priority
        ));
    }

    if let Some(top) = result.highest_priority() {
        output.push_str(&format!(
            "\nFocus first on {} (priority {}).\n",
            top.label, top.priority
        ));
    }

    output
}
