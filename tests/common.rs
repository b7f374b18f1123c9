#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const ADMIN_ID: &str = "0102030405";
pub const ADMIN_SECRET: &str = "clave-admin";

/// A test sandbox: its own HOME (with a fast-hashing config file) and DB.
pub struct Sandbox {
    pub home: PathBuf,
    pub db: String,
}

impl Sandbox {
    /// Fresh HOME dir and DB path under the system temp dir, leftovers removed.
    pub fn new(name: &str) -> Self {
        let home = env::temp_dir().join(format!("rchurch_test_{}", name));
        fs::remove_dir_all(&home).ok();

        let conf_dir = home.join(".rchurch");
        fs::create_dir_all(&conf_dir).expect("create config dir");

        let db = home.join("church.sqlite").to_string_lossy().to_string();
        let conf = format!(
            "database: {}\nkdf_iterations: 1000\npush_gateway_url: http://127.0.0.1:9/unreachable\n",
            db
        );
        fs::write(conf_dir.join("rchurch.conf"), conf).expect("write config");

        Self { home, db }
    }

    /// `rchurch --db <db>` with HOME pointing at the sandbox.
    pub fn cmd(&self) -> Command {
        let mut c = cargo_bin_cmd!("rchurch");
        c.env("HOME", &self.home)
            .env_remove("RCHURCH_USER")
            .env_remove("RCHURCH_PASS")
            .env_remove("RUST_LOG")
            .args(["--db", &self.db]);
        c
    }

    /// Same as `cmd`, authenticated as the bootstrap administrator.
    pub fn admin(&self) -> Command {
        let mut c = self.cmd();
        c.args(["--user", ADMIN_ID, "--pass", ADMIN_SECRET]);
        c
    }

    pub fn init(&self) {
        self.cmd().args(["--test", "init"]).assert().success();
    }

    /// Initialized DB with one administrator registered through the bootstrap rule.
    pub fn with_admin(name: &str) -> Self {
        let sb = Self::new(name);
        sb.init();
        sb.cmd()
            .args([
                "person",
                "add",
                "--first-names",
                "Ana María",
                "--last-names",
                "Pérez",
                "--id",
                ADMIN_ID,
                "--password",
                ADMIN_SECRET,
            ])
            .assert()
            .success();
        sb
    }

    /// Path for an output/input file inside the sandbox.
    pub fn file(&self, name: &str) -> String {
        let p = self.home.join(name);
        fs::remove_file(&p).ok();
        p.to_string_lossy().to_string()
    }
}
