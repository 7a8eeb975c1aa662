/// The alien formation: a dense grid of cells with shared movement state.
///
/// Cells go `Alien → Exploding → Empty`.  A kill only marks the cell as
/// exploding so a renderer can draw the burst; the next formation move
/// sweeps it to empty.
use rand::Rng;

use crate::bullet::Bullet;
use crate::config::AlienConfig;
use crate::environment::PLAY_AREA;
use crate::gun::{Gun, Owner};
use crate::layout::{AlienKind, AlienLayout};
use crate::vector::{Direction, Size, Vector};

#[derive(Clone, Debug)]
pub struct Alien {
    /// `(column, row)` inside the current, possibly contracted, grid.
    grid_position: (usize, usize),
    kind: AlienKind,
    gun: Gun,
}

impl Alien {
    pub fn grid_position(&self) -> (usize, usize) {
        self.grid_position
    }

    pub fn kind(&self) -> AlienKind {
        self.kind
    }

    pub fn score(&self) -> u32 {
        self.kind.score()
    }

    pub fn gun(&self) -> &Gun {
        &self.gun
    }
}

#[derive(Clone, Debug)]
pub enum Cell {
    Alien(Alien),
    Exploding,
    Empty,
}

impl Cell {
    pub fn is_alive(&self) -> bool {
        matches!(self, Cell::Alien(_))
    }

    pub fn alien(&self) -> Option<&Alien> {
        match self {
            Cell::Alien(alien) => Some(alien),
            _ => None,
        }
    }
}

/// Lazy row-major walk over a grid, yielding `(row, column, item)`.
///
/// Reads the grid as it is when iterated, so calling [`AlienSet::cells`]
/// again after a mutation reflects the new state.
pub struct Cells<'a, T> {
    grid: &'a [Vec<T>],
    row: usize,
    column: usize,
}

impl<'a, T> Cells<'a, T> {
    pub fn new(grid: &'a [Vec<T>]) -> Self {
        Self {
            grid,
            row: 0,
            column: 0,
        }
    }
}

impl<'a, T> Iterator for Cells<'a, T> {
    type Item = (usize, usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = self.grid.get(self.row)?;
            if let Some(item) = row.get(self.column) {
                let out = (self.row, self.column, item);
                self.column += 1;
                return Some(out);
            }
            self.row += 1;
            self.column = 0;
        }
    }
}

#[derive(Clone, Debug)]
pub struct AlienSet {
    config: AlienConfig,
    /// Top-left of grid cell `(0, 0)`; equals the bounding box of the living aliens.
    position: Vector,
    size: Size,
    aliens: Vec<Vec<Cell>>,
    alive_count: usize,
    removed_count: usize,
    direction: Direction,
    entering: bool,
    rest_top: f32,
    step_timer: f32,
    move_interval: f32,
}

impl AlienSet {
    /// Build wave number `wave` (0-based) from a validated plan.  The set
    /// starts just above the screen and descends to a resting offset that
    /// grows with the wave number.
    pub fn new(layout: &AlienLayout, config: &AlienConfig, wave: u32, rng: &mut impl Rng) -> Self {
        let mut aliens: Vec<Vec<Cell>> = Vec::with_capacity(layout.row_count());
        for (row, kinds) in layout.rows().iter().enumerate() {
            let mut cells = Vec::with_capacity(kinds.len());
            for (column, kind) in kinds.iter().enumerate() {
                cells.push(match kind {
                    Some(kind) => Cell::Alien(Alien {
                        grid_position: (column, row),
                        kind: *kind,
                        gun: Gun::new(Owner::Alien, &config.gun, rng),
                    }),
                    None => Cell::Empty,
                });
            }
            aliens.push(cells);
        }

        let full_size = grid_size(config, layout.column_count(), layout.row_count());
        let rest_top = (config.rest_top + wave as f32 * config.wave_drop).min(config.max_rest_top);

        let mut set = Self {
            config: *config,
            position: Vector::new((PLAY_AREA - full_size.w) / 2.0, -full_size.h),
            size: full_size,
            alive_count: layout.alien_count(),
            aliens,
            removed_count: 0,
            direction: Direction::Right,
            entering: true,
            rest_top,
            step_timer: 0.0,
            move_interval: config.move_interval,
        };
        set.adapt();
        // Rest on the living rows, not on stripped padding rows of the plan.
        set.position = set.position.with_y(-set.size.h);
        set
    }

    // ── Read access ──────────────────────────────────────────────────────────

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn rows(&self) -> usize {
        self.aliens.len()
    }

    pub fn columns(&self) -> usize {
        self.aliens.first().map_or(0, Vec::len)
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    pub fn removed_count(&self) -> usize {
        self.removed_count
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_entering(&self) -> bool {
        self.entering
    }

    pub fn rest_top(&self) -> f32 {
        self.rest_top
    }

    pub fn move_interval(&self) -> f32 {
        self.move_interval
    }

    pub fn alien_size(&self) -> Size {
        self.config.size
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.aliens.get(row)?.get(column)
    }

    pub fn cells(&self) -> Cells<'_, Cell> {
        Cells::new(&self.aliens)
    }

    /// Only the living aliens, with their grid coordinates.
    pub fn living(&self) -> impl Iterator<Item = (usize, usize, &Alien)> + '_ {
        self.cells()
            .filter_map(|(row, column, cell)| cell.alien().map(|alien| (row, column, alien)))
    }

    /// Top-left corner of the alien in grid cell `(row, column)`.
    pub fn alien_position(&self, row: usize, column: usize) -> Vector {
        self.position
            + Vector::new(
                column as f32 * self.config.pitch.x,
                row as f32 * self.config.pitch.y,
            )
    }

    // ── Per-tick update ──────────────────────────────────────────────────────

    pub fn update(&mut self, time_step: f32) {
        for row in &mut self.aliens {
            for cell in row.iter_mut() {
                if let Cell::Alien(alien) = cell {
                    alien.gun.update(time_step);
                }
            }
        }

        if self.entering {
            let y = self.position.y + self.config.entry_speed * time_step;
            if y >= self.rest_top {
                self.position = self.position.with_y(self.rest_top);
                self.entering = false;
            } else {
                self.position = self.position.with_y(y);
            }
            return;
        }

        self.step_timer += time_step;
        if self.step_timer < self.move_interval {
            return;
        }
        self.step_timer = 0.0;

        let remaining = match self.direction {
            Direction::Right => {
                PLAY_AREA - self.config.side_padding - (self.position.x + self.size.w)
            }
            Direction::Left => self.position.x - self.config.side_padding,
        };

        if remaining <= 0.0 {
            self.position = self.position + Vector::new(0.0, self.config.step_y);
            self.direction = self.direction.reversed();
            tracing::trace!(y = self.position.y, "formation dropped");
        } else {
            let dx = self.config.step_x.min(remaining) * self.direction.sign();
            self.position = self.position + Vector::new(dx, 0.0);
        }

        self.sweep_exploding();
    }

    fn sweep_exploding(&mut self) {
        for cell in self.aliens.iter_mut().flatten() {
            if matches!(cell, Cell::Exploding) {
                *cell = Cell::Empty;
            }
        }
    }

    /// Every living alien whose gun is ready fires one bullet straight down.
    pub fn fire(&mut self, rng: &mut impl Rng) -> Vec<Bullet> {
        let position = self.position;
        let pitch = self.config.pitch;
        let size = self.config.size;
        let mut bullets = Vec::new();

        for (row, cells) in self.aliens.iter_mut().enumerate() {
            for (column, cell) in cells.iter_mut().enumerate() {
                let Cell::Alien(alien) = cell else { continue };
                if !alien.gun.can_fire() {
                    continue;
                }
                let muzzle = position
                    + Vector::new(
                        column as f32 * pitch.x + size.w / 2.0,
                        row as f32 * pitch.y + size.h,
                    );
                bullets.extend(alien.gun.fire(muzzle, Vector::DOWN, rng));
            }
        }
        bullets
    }

    // ── Removal ──────────────────────────────────────────────────────────────

    /// Mark the alien at `(row, column)` as exploding and speed the formation
    /// up.  Returns the score it was worth, or `None` if the cell held no
    /// living alien.
    pub fn kill(&mut self, row: usize, column: usize) -> Option<u32> {
        let cell = self.aliens.get_mut(row)?.get_mut(column)?;
        let score = cell.alien()?.score();
        *cell = Cell::Exploding;

        self.alive_count -= 1;
        self.removed_count += 1;
        self.move_interval *= self.config.speed_up;
        Some(score)
    }

    /// Strip fully-dead border rows and columns, then recompute the bounding
    /// box and grid positions.  A set with no living alien is left as-is.
    pub fn adapt(&mut self) {
        if self.alive_count == 0 {
            return;
        }

        loop {
            let mut stripped = false;

            if self.aliens.first().is_some_and(|row| row_is_dead(row)) {
                self.aliens.remove(0);
                self.position = self.position + Vector::new(0.0, self.config.pitch.y);
                stripped = true;
            }
            if self.aliens.last().is_some_and(|row| row_is_dead(row)) {
                self.aliens.pop();
                stripped = true;
            }
            if self.columns() > 0 && self.column_is_dead(0) {
                for row in &mut self.aliens {
                    row.remove(0);
                }
                self.position = self.position + Vector::new(self.config.pitch.x, 0.0);
                stripped = true;
            }
            if let Some(last) = self.columns().checked_sub(1) {
                if self.column_is_dead(last) {
                    for row in &mut self.aliens {
                        row.pop();
                    }
                    stripped = true;
                }
            }

            if !stripped {
                break;
            }
        }

        for (row, cells) in self.aliens.iter_mut().enumerate() {
            for (column, cell) in cells.iter_mut().enumerate() {
                if let Cell::Alien(alien) = cell {
                    alien.grid_position = (column, row);
                }
            }
        }
        self.size = grid_size(&self.config, self.columns(), self.rows());
    }

    fn column_is_dead(&self, column: usize) -> bool {
        self.aliens
            .iter()
            .all(|row| row.get(column).map_or(true, |cell| !cell.is_alive()))
    }
}

fn row_is_dead(row: &[Cell]) -> bool {
    row.iter().all(|cell| !cell.is_alive())
}

fn grid_size(config: &AlienConfig, columns: usize, rows: usize) -> Size {
    if columns == 0 || rows == 0 {
        return Size::default();
    }
    Size::new(
        (columns - 1) as f32 * config.pitch.x + config.size.w,
        (rows - 1) as f32 * config.pitch.y + config.size.h,
    )
}
