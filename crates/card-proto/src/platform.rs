use std::path::PathBuf;

const APP_DIR: &str = "zephyr-id";

pub fn data_dir() -> PathBuf {
    // On macOS and Linux, use ~/.local/share/zephyr-id/ (XDG standard)
    // instead of macOS Application Support for consistency
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join(APP_DIR)
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

pub fn config_dir() -> PathBuf {
    // On Windows, check for portable config.toml in executable directory first
    #[cfg(windows)]
    {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let portable_config = exe_dir.join("config.toml");
                if portable_config.exists() {
                    return exe_dir.to_path_buf();
                }
            }
        }
    }

    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(APP_DIR)
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

/// Hand `url` to the desktop's default handler. The handler runs detached,
/// so nothing is left for this process to reap.
pub fn open_url(url: &str) -> std::io::Result<()> {
    open::that_detached(url)
}


#[cfg(all(test, target_os = "linux"))]
mod open_tests {
    use super::*;

    fn zombie_children() -> usize {
        let me = std::process::id().to_string();
        let Ok(entries) = std::fs::read_dir("/proc") else {
            return 0;
        };
        entries
            .flatten()
            .filter_map(|e| std::fs::read_to_string(e.path().join("stat")).ok())
            .filter(|stat| {
                // pid (comm) state ppid ...
                let Some(rest) = stat.rsplit_once(") ").map(|(_, r)| r) else {
                    return false;
                };
                let mut fields = rest.split_whitespace();
                let state = fields.next();
                let ppid = fields.next();
                state == Some("Z") && ppid == Some(me.as_str())
            })
            .count()
    }

    #[test]
    fn test_open_url_leaves_no_zombies() {
        let bin = std::env::temp_dir().join(format!("zephyr-id-opener-{}", std::process::id()));
        std::fs::create_dir_all(&bin).unwrap();
        let script = bin.join("xdg-open");
        std::fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let path = std::env::var("PATH").unwrap_or_default();
        std::env::set_var("PATH", format!("{}:{}", bin.display(), path));

        for _ in 0..3 {
            open_url("https://example.com/?a=1&b=2").unwrap();
        }
        std::thread::sleep(std::time::Duration::from_millis(300));
        assert_eq!(zombie_children(), 0);

        std::env::set_var("PATH", path);
        let _ = std::fs::remove_dir_all(&bin);
    }
}
