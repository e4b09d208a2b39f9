use crate::game::ClientGame;
use macroquad::prelude::*;
use shared::Surface;

/// The macroquad window seen as a draw surface with a single fill colour
struct WindowSurface {
    background: Color,
    fill: Color,
}

impl Surface for WindowSurface {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        draw_rectangle(x, y, width, height, self.background);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        draw_rectangle(x, y, width, height, self.fill);
    }
}

pub struct Renderer {
    surface: WindowSurface,
    local_color: Color,
    remote_color: Color,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            surface: WindowSurface {
                background: Color::from_rgba(26, 26, 26, 255),
                fill: WHITE,
            },
            local_color: GREEN,
            remote_color: Color::from_rgba(255, 68, 68, 255),
        }
    }

    pub fn render(&mut self, game: &ClientGame) {
        self.surface
            .clear_rect(0.0, 0.0, screen_width(), screen_height());

        let mirror = game.mirror();

        self.surface.fill = self.remote_color;
        for player in mirror.remote_players() {
            player.draw(&mut self.surface);
        }

        self.surface.fill = self.local_color;
        mirror.local().draw(&mut self.surface);

        self.draw_ui(game);
    }

    fn draw_ui(&mut self, game: &ClientGame) {
        let (status, color) = if game.is_connected() {
            ("CON", GREEN)
        } else {
            ("OFFLINE", RED)
        };

        draw_rectangle(10.0, 10.0, 8.0, 8.0, color);
        draw_text(status, 22.0, 18.0, 16.0, WHITE);

        let player_text = format!("{} players", game.mirror().remote_count() + 1);
        draw_text(&player_text, 10.0, 36.0, 16.0, WHITE);
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
