use std::{collections::BTreeMap, path::PathBuf};

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::*;
use clap::Parser;
use gloomcrawl::{
    Direction, Game, GameConfig, Intent,
    render::{Channel, Glyph, InputSource, MessageSink, Renderer, Tint, draw_scene, publish},
    rng,
    scripted_input::ScriptedInput,
};
use log::{error, info};

const MAP_ORIGIN_X: i32 = 2;
const MAP_ORIGIN_Y: i32 = 3;
const PANEL_X: i32 = 50;

#[derive(Parser, Debug)]
#[command(name = "gloomcrawl")]
#[command(about = "Turn-based dungeon crawl under fog of war")]
#[command(version)]
struct Args {
    /// JSON game config; defaults are used when it is missing or invalid
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay intents from a key script instead of reading the keyboard
    #[arg(long)]
    script: Option<PathBuf>,
}

/// Latest text per channel, drawn as a side panel.
#[derive(Default)]
struct StatusPanel {
    lines: BTreeMap<Channel, String>,
}

impl MessageSink for StatusPanel {
    fn message(&mut self, channel: Channel, text: &str) {
        self.lines.insert(channel, text.to_string());
    }
}

impl StatusPanel {
    fn draw(&self, ctx: &mut BTerm) {
        let mut y = MAP_ORIGIN_Y;
        for (channel, text) in &self.lines {
            if text.is_empty() {
                continue;
            }
            let colour = match channel {
                Channel::GameOver => RGB::named(YELLOW),
                Channel::HeroCombat | Channel::MonsterCombat => RGB::named(ORANGE),
                _ => RGB::named(LIGHT_CYAN),
            };
            ctx.print_color(PANEL_X, y, colour, RGB::named(BLACK), text);
            y += 1;
        }
    }
}

struct TerminalView<'a> {
    ctx: &'a mut BTerm,
}

impl Renderer for TerminalView<'_> {
    fn clear(&mut self) {
        self.ctx.cls();
    }

    fn draw(&mut self, point: Point, glyph: Glyph, tint: Tint) {
        let fg = match tint {
            Tint::Shadow => RGB::named(DARK_GRAY),
            Tint::Light => RGB::named(GRAY),
            Tint::Border => RGB::named(SLATE_GRAY),
            Tint::Accent => RGB::named(GOLD),
            Tint::Hero => RGB::named(WHITE),
        };
        self.ctx.set(
            MAP_ORIGIN_X + point.x,
            MAP_ORIGIN_Y + point.y,
            fg,
            RGB::named(BLACK),
            to_cp437(glyph.ascii()),
        );
    }
}

struct GloomState {
    game: Game<RandomNumberGenerator>,
    panel: StatusPanel,
    script: Option<ScriptedInput>,
}

impl GloomState {
    fn new(config: GameConfig, script: Option<ScriptedInput>) -> Self {
        let seed = config.seed;
        let mut game = Game::new(config, rng::from_seed(seed));
        let mut panel = StatusPanel::default();
        publish(&mut panel, &game.drain_events());
        Self {
            game,
            panel,
            script,
        }
    }

    fn next_intent(&mut self, ctx: &BTerm) -> Option<Intent> {
        if let Some(script) = self.script.as_mut() {
            return script.next_intent();
        }
        match ctx.key? {
            VirtualKeyCode::Up | VirtualKeyCode::W | VirtualKeyCode::K => {
                Some(Intent::Move(Direction::Up))
            }
            VirtualKeyCode::Down | VirtualKeyCode::S | VirtualKeyCode::J => {
                Some(Intent::Move(Direction::Down))
            }
            VirtualKeyCode::Left | VirtualKeyCode::A | VirtualKeyCode::H => {
                Some(Intent::Move(Direction::Left))
            }
            VirtualKeyCode::Right | VirtualKeyCode::D | VirtualKeyCode::L => {
                Some(Intent::Move(Direction::Right))
            }
            VirtualKeyCode::Back => Some(Intent::RegenerateLevel),
            VirtualKeyCode::X => Some(Intent::DebugGrant),
            _ => None,
        }
    }
}

impl GameState for GloomState {
    fn tick(&mut self, ctx: &mut BTerm) {
        if ctx.key == Some(VirtualKeyCode::Escape) {
            ctx.quit();
            return;
        }
        if let Some(intent) = self.next_intent(ctx) {
            let events = self.game.handle(intent);
            publish(&mut self.panel, &events);
        }

        let header = format!("gloomcrawl - depth {}", self.game.depth());
        {
            let mut view = TerminalView { ctx: &mut *ctx };
            draw_scene(&mut view, self.game.level(), self.game.player());
        }
        ctx.print_color_centered(1, RGB::named(YELLOW), RGB::named(BLACK), &header);
        self.panel.draw(ctx);
    }
}

fn load_config(path: Option<&PathBuf>) -> GameConfig {
    let Some(path) = path else {
        return GameConfig::default();
    };
    match GameConfig::load(path) {
        Ok(config) => {
            info!("loaded config from {}", path.display());
            config
        }
        Err(err) => {
            error!("{err}; falling back to defaults");
            GameConfig::default()
        }
    }
}

fn main() -> BError {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .try_init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref());
    let script = match args.script.as_ref().map(ScriptedInput::from_file) {
        Some(Ok(script)) => Some(script),
        Some(Err(err)) => {
            error!("could not read input script: {err}");
            None
        }
        None => None,
    };

    let context = BTermBuilder::simple80x50()
        .with_title("gloomcrawl")
        .build()?;
    main_loop(context, GloomState::new(config, script))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_and_script_paths() {
        let args = Args::try_parse_from([
            "gloomcrawl",
            "--config",
            "crawl.json",
            "--script",
            "moves.txt",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("crawl.json")));
        assert_eq!(args.script, Some(PathBuf::from("moves.txt")));
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Args::try_parse_from(["gloomcrawl", "--seed", "3"]).is_err());
        let args = Args::try_parse_from(["gloomcrawl"]).unwrap();
        assert!(args.config.is_none() && args.script.is_none());
    }
}
