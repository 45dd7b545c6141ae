use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use shared::protocol::{CreateStudentRequest, GpaOrder, MarksInput};
use tracing_subscriber::EnvFilter;

mod client;

use client::GradebookClient;

#[derive(Parser, Debug)]
#[command(name = "gradebook", about = "Drive a running gradebook server")]
struct Cli {
    #[arg(long, env = "GRADEBOOK_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the curriculum subject catalog.
    Subjects,
    List {
        #[arg(long, value_enum)]
        order: Option<OrderArg>,
    },
    Show {
        id: String,
    },
    Create {
        name: String,
        #[arg(long)]
        email: Option<String>,
        /// SUBJECT=SCORE, repeatable. A score of `-` sends no value.
        #[arg(long = "mark", value_parser = parse_mark)]
        marks: Vec<(String, Option<f64>)>,
    },
    Delete {
        id: String,
    },
    AddGrade {
        id: String,
        #[arg(allow_negative_numbers = true)]
        grade: f64,
    },
    RemoveGrade {
        id: String,
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Replace every subject mark of a student.
    SetMarks {
        id: String,
        #[arg(long = "mark", value_parser = parse_mark)]
        marks: Vec<(String, Option<f64>)>,
    },
    /// Merge subject marks into a student's existing marks.
    UpdateMarks {
        id: String,
        #[arg(long = "mark", value_parser = parse_mark, required = true)]
        marks: Vec<(String, Option<f64>)>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for GpaOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Asc => GpaOrder::Asc,
            OrderArg::Desc => GpaOrder::Desc,
        }
    }
}

fn parse_mark(raw: &str) -> Result<(String, Option<f64>), String> {
    let (subject, score) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected SUBJECT=SCORE, got '{raw}'"))?;
    let score = score.trim();
    if score == "-" {
        return Ok((subject.to_string(), None));
    }
    score
        .parse::<f64>()
        .map(|score| (subject.to_string(), Some(score)))
        .map_err(|_| format!("invalid score '{score}' for subject '{subject}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = GradebookClient::new(cli.server_url);

    match cli.command {
        Command::Subjects => {
            for subject in client.subjects().await? {
                println!("{subject}");
            }
        }
        Command::List { order } => print_json(&client.list(order.map(Into::into)).await?)?,
        Command::Show { id } => print_json(&client.show(&id).await?)?,
        Command::Create { name, email, marks } => {
            let req = CreateStudentRequest {
                name,
                email,
                subject_marks: (!marks.is_empty()).then(|| marks.into_iter().collect()),
            };
            print_json(&client.create(&req).await?)?;
        }
        Command::Delete { id } => {
            if !client.delete(&id).await? {
                return Err(anyhow!("no student with id {id}"));
            }
            println!("deleted {id}");
        }
        Command::AddGrade { id, grade } => print_json(&client.add_grade(&id, grade).await?)?,
        Command::RemoveGrade { id, index } => {
            print_json(&client.remove_grade(&id, index).await?)?
        }
        Command::SetMarks { id, marks } => {
            print_json(&client.set_marks(&id, marks.into_iter().collect::<MarksInput>()).await?)?
        }
        Command::UpdateMarks { id, marks } => print_json(
            &client
                .update_marks(&id, marks.into_iter().collect::<MarksInput>())
                .await?,
        )?,
    }

    Ok(())
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
