use crate::session::TurnOutput;
use colored::*;

/// Display the rendered turn: interpretation, steps, revisions, final
/// answer, and the timing annotation.
pub fn display_turn(output: &TurnOutput) {
    println!("{}", "Interpretation".cyan().bold());
    println!("{}\n", output.interpretation);

    if !output.steps.is_empty() {
        println!("{}", "Steps".cyan().bold());
        println!("{}\n", output.steps);
    }

    if !output.revisions.is_empty() {
        println!("{}", "Revisions".cyan().bold());
        println!("{}\n", output.revisions);
    }

    println!("{}", "Final answer".cyan().bold());
    println!("{}\n", output.final_answer);

    println!("{}", output.timing.dimmed());
}
