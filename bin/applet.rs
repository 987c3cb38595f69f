use anyhow::Error as Anyhow;
use clap::Subcommand;
use derive_more::From;

mod play;
mod rules;

#[derive(From, Subcommand)]
pub enum Applet {
    Play(play::Play),
    Rules(rules::Rules),
}

impl Default for Applet {
    fn default() -> Self {
        play::Play::default().into()
    }
}

impl Applet {
    pub fn execute(self) -> Result<(), Anyhow> {
        match self {
            Applet::Play(a) => a.execute(),
            Applet::Rules(a) => a.execute(),
        }
    }
}
