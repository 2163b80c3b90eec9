use clue_core::ledger::Ledger;
use std::fmt::Write;

const SEPARATOR: &str = " | ";

/// Fixed-width token × participant table, grouped by category.
pub fn grid(ledger: &Ledger) -> String {
    let catalog = ledger.catalog();
    let roster = ledger.roster();
    let matrix = ledger.matrix();

    let labels: Vec<Vec<String>> = catalog
        .tokens()
        .map(|token| matrix.row(token).iter().map(|cell| cell.to_string()).collect())
        .collect();

    let name_width = catalog
        .names()
        .chain(catalog.categories().iter().map(|c| c.name()))
        .map(str::len)
        .max()
        .unwrap_or(0);
    let widths: Vec<usize> = roster
        .participants()
        .map(|participant| {
            labels
                .iter()
                .map(|row| row[participant.index()].len())
                .chain([roster.name(participant).len(), 3])
                .max()
                .unwrap_or(3)
        })
        .collect();

    let mut out = String::new();
    let _ = write!(out, "{:name_width$}", "");
    for (participant, width) in roster.participants().zip(widths.iter().copied()) {
        let _ = write!(out, "{SEPARATOR}{:width$}", roster.name(participant));
    }
    out.push('\n');
    let total = name_width + widths.iter().map(|w| w + SEPARATOR.len()).sum::<usize>();
    out.push_str(&"-".repeat(total));
    out.push('\n');

    for category in catalog.categories() {
        let _ = writeln!(out, "{}", category.name());
        for &token in category.tokens() {
            let _ = write!(out, "{:name_width$}", catalog.name(token));
            for (label, width) in labels[token.index()].iter().zip(widths.iter().copied()) {
                let _ = write!(out, "{SEPARATOR}{label:width$}");
            }
            let trimmed = out.trim_end_matches(' ').len();
            out.truncate(trimmed);
            out.push('\n');
        }
    }
    out.push_str(&solution_line(ledger));
    out.push('\n');
    out
}

pub fn solution_line(ledger: &Ledger) -> String {
    match ledger.solve() {
        Some(solution) => {
            let names: Vec<&str> = solution.names(ledger.catalog()).collect();
            format!("Solution: {}", names.join(", "))
        }
        None => {
            let open: Vec<String> = (0..ledger.catalog().categories().len())
                .filter_map(|index| ledger.candidates(index).ok())
                .map(|candidates| candidates.len().to_string())
                .collect();
            format!("Solution: unknown (candidates per category: {})", open.join("/"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{grid, solution_line};
    use clue_core::ledger::Ledger;
    use clue_core::model::catalog::{Catalog, Token};
    use clue_core::model::roster::{Participant, Roster};

    fn tiny() -> Ledger {
        let catalog = Catalog::new([("Colors", ["Red", "Green"]), ("Shapes", ["Circle", "Square"])])
            .unwrap();
        let roster = Roster::new([("Me", 1), ("You", 1)]).unwrap();
        Ledger::new(catalog, roster, Participant::from_index(0), &[Token::from_index(0)]).unwrap()
    }

    #[test]
    fn grid_lists_every_token_under_its_category() {
        let text = grid(&tiny());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0].trim(), "| Me  | You");
        assert_eq!(lines[2], "Colors");
        assert_eq!(lines[3], "Red    | YES | NO");
        assert_eq!(lines[4], "Green  | NO  | NO");
        assert_eq!(lines[6], "Circle | NO  |");
        assert_eq!(lines[5], "Shapes");
        assert_eq!(
            *lines.last().unwrap(),
            "Solution: unknown (candidates per category: 1/2)"
        );
    }

    #[test]
    fn solution_line_names_tokens_once_solved() {
        let mut ledger = tiny();
        ledger
            .update(
                &[Token::from_index(1), Token::from_index(2)],
                &[],
                Some(Participant::from_index(1)),
                Some(Token::from_index(2)),
            )
            .unwrap();
        assert_eq!(solution_line(&ledger), "Solution: Green, Square");
    }
}
