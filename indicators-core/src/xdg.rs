use std::env;
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct Xdg {
    pub app_name: Option<PathBuf>,
}

impl Xdg {
    pub fn new(app_name: PathBuf) -> Self {
        Xdg {
            app_name: Some(app_name),
        }
    }

    pub fn config_dir(&self) -> PathBuf {
        config_dir(self.app_name.as_ref())
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir().join("config.toml")
    }
}

/// Relative values are ignored.
fn absolute_env_var(env_var: &str) -> Option<PathBuf> {
    env::var_os(env_var)
        .map(PathBuf::from)
        .filter(|path| path.is_absolute())
}

pub fn config_dir(app_name: Option<impl AsRef<Path>>) -> PathBuf {
    let mut dir = absolute_env_var("XDG_CONFIG_HOME").unwrap_or_else(|| {
        #[allow(deprecated)]
        env::home_dir().unwrap_or_default().join(".config")
    });

    if let Some(name) = app_name {
        dir.push(name);
    }

    dir
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    // Both cases live in one test, the environment is process wide.
    #[test]
    fn config_dir_test() -> Result<()> {
        unsafe {
            env::set_var("HOME", "/home/test");
            env::set_var("XDG_CONFIG_HOME", "/home/test/custom");
        }

        assert_eq!(
            config_dir(Some("app")),
            PathBuf::from("/home/test/custom/app")
        );
        assert_eq!(
            Xdg::new("app".into()).config_file(),
            PathBuf::from("/home/test/custom/app/config.toml")
        );

        unsafe {
            env::set_var("XDG_CONFIG_HOME", "relative/dir");
        }
        assert_eq!(
            config_dir(Some("app")),
            PathBuf::from("/home/test/.config/app")
        );

        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
        assert_eq!(config_dir(None::<&str>), PathBuf::from("/home/test/.config"));

        Ok(())
    }
}
