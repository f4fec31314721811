pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        #[serde(default = "default_db_url")]
        pub db_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
    }

    impl Config {
        /// Loads configuration from environment variables (`DB_URL`, `PORT`).
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                db_url: default_db_url(),
                port: default_port(),
            }
        }
    }

    fn default_db_url() -> String {
        "postgres://localhost:5432/todoapp".to_string()
    }

    fn default_port() -> u16 {
        5000
    }
}

pub mod entities;
pub mod task;
pub mod web;
