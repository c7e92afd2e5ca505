//! Frame rendering.
//!
//! The run loop hands a read-only [`Frame`] to a [`Renderer`] after every
//! tick. Rendering never feeds back into the simulation.

use gridchase_types::{Agent, Cell, Role};
use gridchase_world::GridWorld;

use crate::episode::{EpisodeManager, EpisodeState};

/// Read-only view of the world after a tick.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Ticks executed so far.
    pub tick: u64,
    /// Live terrain.
    pub grid: &'a GridWorld,
    /// Live roster in turn order.
    pub agents: &'a [Agent],
    /// Scoreboard.
    pub state: &'a EpisodeState,
}

impl<'a> Frame<'a> {
    /// Borrow the current state of `manager`.
    pub fn of(manager: &'a EpisodeManager, tick: u64) -> Self {
        Self {
            tick,
            grid: manager.world(),
            agents: manager.agents().agents(),
            state: manager.state(),
        }
    }
}

/// Receives a frame after every tick.
pub trait Renderer {
    /// Draw one frame.
    fn render(&mut self, frame: &Frame<'_>);
}

/// Discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpRenderer;

impl Renderer for NoOpRenderer {
    fn render(&mut self, _frame: &Frame<'_>) {}
}

/// Draws frames as plain text.
///
/// Each cell is two characters wide so the grid looks square in a
/// terminal. Walls are `██`, rewards `· `, pursuers `P `, targets `T `.
/// When agents of both roles share a cell the pursuer is drawn.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    last: String,
}

impl TextRenderer {
    /// Create a renderer with an empty buffer.
    pub const fn new() -> Self {
        Self { last: String::new() }
    }

    /// The most recently rendered frame.
    pub fn output(&self) -> &str {
        &self.last
    }

    /// Draw `frame` into a fresh string.
    pub fn draw(frame: &Frame<'_>) -> String {
        let size = frame.grid.size();
        let mut out = format!(
            "ITERATION {:06}   SCORE {:08}   HIGH SCORE {:08}   TICK {}\n",
            frame.state.iteration, frame.state.score, frame.state.high_score, frame.tick
        );

        let border = "██".repeat(size.saturating_add(2));
        out.push_str(&border);
        out.push('\n');
        for (row, cells) in frame.grid.rows().enumerate() {
            out.push_str("██");
            for (col, &cell) in cells.iter().enumerate() {
                out.push_str(glyph(frame.agents, row, col, cell));
            }
            out.push_str("██\n");
        }
        out.push_str(&border);
        out.push('\n');
        out
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, frame: &Frame<'_>) {
        self.last = Self::draw(frame);
    }
}

fn glyph(agents: &[Agent], row: usize, col: usize, cell: Cell) -> &'static str {
    let mut here = agents
        .iter()
        .filter(|a| a.position.row == row && a.position.col == col);
    let occupant = here.clone().find(|a| a.role == Role::Pursuer).or_else(|| here.next());
    match (occupant.map(|a| a.role), cell) {
        (Some(Role::Pursuer), _) => "P ",
        (Some(Role::Target), _) => "T ",
        (None, Cell::Wall) => "██",
        (None, Cell::Reward) => "· ",
        (None, Cell::Empty) => "  ",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridchase_agents::AgentRegistry;
    use gridchase_types::{AgentColor, Control, Position};

    use super::*;

    #[test]
    fn draws_terrain_agents_and_hud() {
        let mut world = GridWorld::new(2).unwrap();
        world.set(Position::new(0, 1), Cell::Wall).unwrap();
        world.set(Position::new(1, 1), Cell::Reward).unwrap();
        let mut agents = AgentRegistry::new();
        agents
            .register_at(&world, Position::new(0, 0), Role::Target, AgentColor::Green, Control::External)
            .unwrap();
        agents
            .register_at(&world, Position::new(1, 0), Role::Pursuer, AgentColor::Red, Control::External)
            .unwrap();
        let manager = EpisodeManager::new(world, agents);

        let mut renderer = TextRenderer::new();
        renderer.render(&Frame::of(&manager, 3));
        let lines: Vec<&str> = renderer.output().lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines.first().copied(),
            Some("ITERATION 000000   SCORE 00000000   HIGH SCORE 00000000   TICK 3")
        );
        assert_eq!(lines.get(1).copied(), Some("████████"));
        assert_eq!(lines.get(2).copied(), Some("██T ████"));
        assert_eq!(lines.get(3).copied(), Some("██P · ██"));
    }

    #[test]
    fn pursuer_drawn_over_target() {
        let agents = vec![
            Agent {
                id: gridchase_types::AgentId::new(0),
                position: Position::new(0, 0),
                role: Role::Target,
                color: AgentColor::Green,
                control: Control::External,
            },
            Agent {
                id: gridchase_types::AgentId::new(1),
                position: Position::new(0, 0),
                role: Role::Pursuer,
                color: AgentColor::Red,
                control: Control::External,
            },
        ];
        assert_eq!(glyph(&agents, 0, 0, Cell::Empty), "P ");
        assert_eq!(glyph(&agents, 0, 1, Cell::Reward), "· ");
    }
}
