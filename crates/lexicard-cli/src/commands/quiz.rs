//! The `lexicard quiz` command.
//!
//! Line-oriented session over stdin. Type an answer to check it, press Enter
//! for the next question, `9` / `0` to mark the current word correct or
//! incorrect, `q` to quit.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use lexicard_core::controller::{Command, Outcome, StudyController};
use lexicard_core::quiz::{AnswerCheck, Question, QuestionKind, QuizResult};
use lexicard_core::QuizMode;

use crate::GlobalOpts;

pub fn execute(
    global: &GlobalOpts,
    category: Option<String>,
    mode: Option<String>,
    save_wrong: bool,
) -> Result<()> {
    let (_, mut controller) = super::open(global)?;

    let settings = controller.settings();
    let category = category.unwrap_or_else(|| settings.word_source.clone());
    let mode = match mode {
        Some(m) => m.parse::<QuizMode>().map_err(anyhow::Error::msg)?,
        None => settings.quiz_mode,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = run(
        &mut controller,
        &category,
        mode,
        save_wrong,
        stdin.lock(),
        stdout.lock(),
    );
    controller.save()?;
    outcome
}

fn run<R: BufRead, W: Write>(
    controller: &mut StudyController,
    category: &str,
    mode: QuizMode,
    save_wrong: bool,
    input: R,
    mut out: W,
) -> Result<()> {
    let started = controller.dispatch(Command::StartQuiz {
        category: category.to_string(),
        mode,
    })?;
    if let Outcome::Started { stats, question } = started {
        writeln!(
            out,
            "Quiz: {} word(s) from \"{category}\", mode {mode}",
            stats.total
        )?;
        writeln!(out, "Type an answer, Enter for next, 9/0 to mark correct/incorrect, q to quit.")?;
        print_question(&mut out, &question)?;
    }

    let mut lines = input.lines();
    loop {
        let Some(line) = lines.next() else {
            writeln!(out, "\nQuiz abandoned.")?;
            break;
        };
        let line = line.context("failed to read input")?;

        let command = match (line.trim(), controller.engine().is_answer_checked()) {
            ("q", _) => {
                writeln!(out, "Quiz abandoned.")?;
                break;
            }
            ("9", _) => Command::MarkAnswer(true),
            ("0", _) => Command::MarkAnswer(false),
            ("", true) => Command::NextQuestion,
            ("", false) => {
                writeln!(out, "Type an answer, or 9/0 to mark the word.")?;
                continue;
            }
            (_, true) => {
                writeln!(out, "Press Enter for the next question, 9/0 to change the mark.")?;
                continue;
            }
            (answer, false) => Command::CheckAnswer(answer.to_string()),
        };

        match controller.dispatch(command) {
            Ok(Outcome::Checked(check)) => print_check(&mut out, &check)?,
            Ok(Outcome::Marked(mark)) => {
                let verdict = if mark.is_correct { "correct" } else { "incorrect" };
                writeln!(out, "Marked \"{}\" as {verdict}.", mark.word.word)?;
            }
            Ok(Outcome::Advanced(question)) => print_question(&mut out, &question)?,
            Ok(Outcome::Finished { result, .. }) => {
                print_results(&mut out, &result)?;
                if save_wrong && !result.incorrect_words.is_empty() {
                    if let Outcome::WrongWordsAdded(report) =
                        controller.dispatch(Command::AddWrongToWrongWords)?
                    {
                        writeln!(
                            out,
                            "Added {} word(s) to wrongWords ({} already there).",
                            report.added, report.skipped
                        )?;
                    }
                }
                if result.incorrect_words.is_empty() {
                    break;
                }

                writeln!(
                    out,
                    "Enter r to retry the {} wrong word(s), anything else to quit.",
                    result.incorrect_count
                )?;
                let retry = match lines.next() {
                    Some(line) => line.context("failed to read input")?.trim().eq_ignore_ascii_case("r"),
                    None => false,
                };
                if !retry {
                    break;
                }
                if let Outcome::Restarted { stats, question } =
                    controller.dispatch(Command::RestartWrongOnly)?
                {
                    writeln!(out, "Retrying {} word(s).", stats.total)?;
                    print_question(&mut out, &question)?;
                }
            }
            Ok(_) => {}
            Err(e) => writeln!(out, "{e}")?,
        }
    }
    Ok(())
}

fn print_question<W: Write>(out: &mut W, q: &Question) -> io::Result<()> {
    let label = match q.kind {
        QuestionKind::Translation => "Translate",
        QuestionKind::Definition => "Which word means",
    };
    writeln!(
        out,
        "\n[{}/{}] {label}: {} ({})",
        q.number, q.total, q.prompt, q.part_of_speech
    )
}

fn print_check<W: Write>(out: &mut W, check: &AnswerCheck) -> io::Result<()> {
    if check.is_correct {
        writeln!(out, "Correct! {}", check.explanation)
    } else {
        writeln!(out, "Incorrect. Answer: {}", check.correct_answer)?;
        writeln!(out, "  {}", check.explanation)
    }
}

fn print_results<W: Write>(out: &mut W, result: &QuizResult) -> io::Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Total", "Correct", "Incorrect", "Accuracy"]);
    table.add_row(vec![
        Cell::new(result.total_words),
        Cell::new(result.correct_count),
        Cell::new(result.incorrect_count),
        Cell::new(format!("{}%", result.accuracy)),
    ]);
    writeln!(out, "\nQuiz finished ({}).\n{table}", result.mode)?;

    if !result.incorrect_words.is_empty() {
        writeln!(out, "Words to review:\n{}", super::word_table(&result.incorrect_words))?;
    }
    Ok(())
}
