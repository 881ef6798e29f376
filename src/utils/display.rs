//! Display and output formatting utilities

use crate::engine::Generation;
use crate::game_of_life::{is_alive, WorldState};
use serde::Serialize;

/// Format worlds for console output
pub struct WorldFormatter;

impl WorldFormatter {
    /// Format a world in compact form
    pub fn format_compact(world: &WorldState) -> String {
        let mut output = String::with_capacity(world.rows() * (world.cols() + 1));
        for row in world.iter_rows() {
            for &cell in row {
                output.push(if is_alive(cell) { '█' } else { '·' });
            }
            output.push('\n');
        }
        output
    }

    /// Format a world with row and column coordinates
    pub fn format_with_coords(world: &WorldState) -> String {
        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        for col in 0..world.cols() {
            output.push_str(&format!("{:2}", col % 10));
        }
        output.push('\n');

        // Rows with row numbers
        for (row, cells) in world.iter_rows().enumerate() {
            output.push_str(&format!("{:2} ", row));
            for &cell in cells {
                output.push_str(if is_alive(cell) { "██" } else { "··" });
            }
            output.push('\n');
        }

        output
    }

    /// One-line summary of a generation
    pub fn format_summary(generation: &Generation) -> String {
        let world = &generation.world;
        let total = world.rows() * world.cols();
        let density = if total > 0 {
            world.living_count() as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        format!(
            "Generation {}: {}x{}, {} living ({:.1}%)",
            generation.index,
            world.rows(),
            world.cols(),
            world.living_count(),
            density
        )
    }

    /// JSON document describing a generation
    pub fn format_json(generation: &Generation) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            generation: u64,
            living: usize,
            world: &'a WorldState,
        }

        serde_json::to_string_pretty(&Snapshot {
            generation: generation.index,
            living: generation.world.living_count(),
            world: &generation.world,
        })
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Blue => 34,
        }
    }
}
