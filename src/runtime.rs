// Copyright (c) 2026 rezky_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParticleKind {
    #[default]
    #[value(name = "hearts")]
    Hearts,
    #[value(name = "snow")]
    Snow,
    #[value(name = "petals")]
    Petals,
}

impl ParticleKind {
    pub fn next(self) -> Self {
        match self {
            ParticleKind::Hearts => ParticleKind::Snow,
            ParticleKind::Snow => ParticleKind::Petals,
            ParticleKind::Petals => ParticleKind::Hearts,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParticleKind::Hearts => "cœurs",
            ParticleKind::Snow => "neige",
            ParticleKind::Petals => "pétales",
        }
    }
}
