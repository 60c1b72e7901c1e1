use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

#[allow(dead_code)]
pub fn run_callsight(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}

pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    data: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            data: tempfile::tempdir().expect("create temporary XDG data dir"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_callsight"))
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env("XDG_DATA_HOME", self.data.path())
            .env_remove("OPENAI_API_KEY")
            .output()
            .expect("failed to execute callsight binary")
    }

    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        self.config.path().join("callsight").join("config.toml")
    }

    /// Application data directory as the `directories` crate resolves it.
    #[allow(dead_code)]
    pub fn data_dir(&self) -> PathBuf {
        self.data.path().join("callsight")
    }

    /// Seed a transcript table where `callsight analyze` expects one.
    #[allow(dead_code)]
    pub fn write_transcripts(&self, transcripts: &[&str]) {
        let dir = self.data_dir();
        std::fs::create_dir_all(&dir).expect("create data dir");

        let mut content = String::from("transcript\n");
        for transcript in transcripts {
            content.push('"');
            content.push_str(&transcript.replace('"', "\"\""));
            content.push_str("\"\n");
        }
        std::fs::write(dir.join("transcripts.csv"), content).expect("write transcripts.csv");
    }
}
