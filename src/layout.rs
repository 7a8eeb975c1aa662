/// Textual layout plans for the alien formation and the walls.
///
/// A plan is a multi-line string, one line per row, all rows the same width.
/// Blank lines are ignored so plans can be written as indented literals.
use crate::error::LayoutError;

/// The formation every wave starts from.
pub const CANONICAL_ALIEN_PLAN: &str = concat!(
    "AAAAAAAAAAA\n",
    "BBBBBBBBBBB\n",
    "BBBBBBBBBBB\n",
    "CCCCCCCCCCC\n",
    "CCCCCCCCCCC\n",
);

/// Shape shared by every wall.
pub const CANONICAL_WALL_PLAN: &str = concat!(
    "  ####  \n",
    " ###### \n",
    "########\n",
    "########\n",
    "##    ##\n",
);

pub const EMPTY_CELL: char = '.';
pub const SOLID_PIECE: char = '#';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlienKind {
    Squid,
    Crab,
    Octopus,
}

impl AlienKind {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'A' => Some(AlienKind::Squid),
            'B' => Some(AlienKind::Crab),
            'C' => Some(AlienKind::Octopus),
            _ => None,
        }
    }

    /// Score awarded for shooting one alien of this kind.
    pub fn score(self) -> u32 {
        match self {
            AlienKind::Squid => 30,
            AlienKind::Crab => 20,
            AlienKind::Octopus => 10,
        }
    }
}

fn parse_rows<T>(
    plan: &str,
    mut cell: impl FnMut(char, usize, usize) -> Result<T, LayoutError>,
) -> Result<Vec<Vec<T>>, LayoutError> {
    let mut rows: Vec<Vec<T>> = Vec::new();
    let mut expected = None;

    for (row, line) in plan.lines().filter(|l| !l.is_empty()).enumerate() {
        let parsed = line
            .chars()
            .enumerate()
            .map(|(column, ch)| cell(ch, row, column))
            .collect::<Result<Vec<T>, _>>()?;

        let expected = *expected.get_or_insert(parsed.len());
        if parsed.len() != expected {
            return Err(LayoutError::RaggedRow {
                row,
                expected,
                found: parsed.len(),
            });
        }
        rows.push(parsed);
    }

    if rows.is_empty() {
        return Err(LayoutError::Empty);
    }
    Ok(rows)
}

/// A validated alien plan: `None` marks an empty slot.
#[derive(Clone, Debug, PartialEq)]
pub struct AlienLayout {
    rows: Vec<Vec<Option<AlienKind>>>,
}

impl AlienLayout {
    pub fn parse(plan: &str) -> Result<Self, LayoutError> {
        let rows = parse_rows(plan, |ch, row, column| {
            if ch == EMPTY_CELL {
                return Ok(None);
            }
            AlienKind::from_char(ch)
                .map(Some)
                .ok_or(LayoutError::UnknownCharacter { ch, row, column })
        })?;

        if rows.iter().flatten().all(Option::is_none) {
            return Err(LayoutError::NoAliens);
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<Option<AlienKind>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows[0].len()
    }

    pub fn alien_count(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_some()).count()
    }
}

/// A validated wall plan: `true` marks a solid piece.
#[derive(Clone, Debug, PartialEq)]
pub struct WallLayout {
    pieces: Vec<Vec<bool>>,
}

impl WallLayout {
    /// Any character other than `#` is an empty piece; only the shape can be invalid.
    pub fn parse(plan: &str) -> Result<Self, LayoutError> {
        let pieces = parse_rows(plan, |ch, _, _| Ok(ch == SOLID_PIECE))?;
        Ok(Self { pieces })
    }

    pub fn pieces(&self) -> &[Vec<bool>] {
        &self.pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_plans_parse() {
        let aliens = AlienLayout::parse(CANONICAL_ALIEN_PLAN).unwrap();
        assert_eq!(aliens.row_count(), 5);
        assert_eq!(aliens.column_count(), 11);
        assert_eq!(aliens.alien_count(), 55);
        assert_eq!(aliens.rows()[0][0], Some(AlienKind::Squid));
        assert_eq!(aliens.rows()[4][10], Some(AlienKind::Octopus));

        let wall = WallLayout::parse(CANONICAL_WALL_PLAN).unwrap();
        assert_eq!(wall.pieces().len(), 5);
        assert!(wall.pieces().iter().all(|row| row.len() == 8));
        assert!(!wall.pieces()[0][0]);
        assert!(wall.pieces()[2][0]);
    }

    #[test]
    fn unknown_alien_character_is_rejected() {
        let err = AlienLayout::parse("AB\nAX").unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnknownCharacter {
                ch: 'X',
                row: 1,
                column: 1
            }
        );
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert_eq!(
            AlienLayout::parse("AAA\nAA").unwrap_err(),
            LayoutError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert!(matches!(
            WallLayout::parse("##\n###"),
            Err(LayoutError::RaggedRow { .. })
        ));
    }

    #[test]
    fn empty_plans_are_rejected() {
        assert_eq!(AlienLayout::parse("").unwrap_err(), LayoutError::Empty);
        assert_eq!(WallLayout::parse("\n\n").unwrap_err(), LayoutError::Empty);
        assert_eq!(AlienLayout::parse("...\n...").unwrap_err(), LayoutError::NoAliens);
    }

    #[test]
    fn wall_accepts_any_character() {
        let wall = WallLayout::parse("#x#\n?#!").unwrap();
        assert_eq!(
            wall.pieces(),
            &[vec![true, false, true], vec![false, true, false]]
        );
    }
}
