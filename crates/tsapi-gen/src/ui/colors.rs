use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::Color as ComfyColor;
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy)]
pub enum Theme {
  Dark,
  Light,
}

pub struct Colors {
  enabled: bool,
  theme: Theme,
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  const fn pick(&self, dark: Color, light: Color) -> Color {
    if !self.enabled {
      return Color::Reset;
    }
    match self.theme {
      Theme::Dark => dark,
      Theme::Light => light,
    }
  }

  pub const fn timestamp(&self) -> Color {
    self.pick(Color::Rgb { r: 108, g: 148, b: 166 }, Color::Rgb { r: 82, g: 96, b: 110 })
  }

  pub const fn primary(&self) -> Color {
    self.pick(Color::Rgb { r: 189, g: 147, b: 36 }, Color::Rgb { r: 84, g: 56, b: 24 })
  }

  pub const fn accent(&self) -> Color {
    self.pick(Color::Rgb { r: 196, g: 94, b: 60 }, Color::Rgb { r: 182, g: 74, b: 48 })
  }

  pub const fn success(&self) -> Color {
    self.pick(Color::Rgb { r: 96, g: 166, b: 122 }, Color::Rgb { r: 32, g: 128, b: 80 })
  }

  pub const fn label(&self) -> Color {
    self.pick(Color::Rgb { r: 214, g: 172, b: 32 }, Color::Rgb { r: 160, g: 98, b: 54 })
  }

  pub const fn value(&self) -> Color {
    self.pick(Color::Rgb { r: 236, g: 212, b: 92 }, Color::Rgb { r: 186, g: 138, b: 64 })
  }
}

/// Bridges the crossterm palette into comfy-table cells.
pub fn to_comfy(color: Color) -> ComfyColor {
  match color {
    Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
    _ => ComfyColor::Reset,
  }
}

pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::io::stdout().is_terminal(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => detect_terminal_theme(),
  }
}

fn detect_terminal_theme() -> Theme {
  if let Ok(colorfgbg) = std::env::var("COLORFGBG")
    && let Some(background) = colorfgbg.split(';').next_back()
    && let Ok(value) = background.parse::<u8>()
  {
    return if value >= 8 { Theme::Light } else { Theme::Dark };
  }

  Theme::Dark
}
