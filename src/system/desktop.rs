// Desktop automation: volume, brightness, screenshots, opening things.
//
// Everything here shells out to whatever the platform ships with.
// Nothing is retried; a failed tool is reported and the caller decides
// what to tell the user.

use crate::error::{JarvisError, Result};
use log::debug;
use std::path::Path;
use std::process::Command;

/// Direction for volume/brightness changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

/// OS-level side effects the dispatcher can trigger
///
/// Calls block until the external tool finishes; the dispatcher runs them
/// on tokio's blocking pool.
pub trait Desktop: Send + Sync {
    /// Capture the screen into `dest`
    fn screenshot(&self, dest: &Path) -> Result<()>;

    fn change_volume(&self, step: Step) -> Result<()>;

    fn change_brightness(&self, step: Step) -> Result<()>;

    /// Open a URL or a folder with the default handler
    fn open(&self, target: &str) -> Result<()>;

    /// Start a program by path, without waiting for it
    fn launch(&self, program: &Path) -> Result<()>;

    /// Run the external image generator on a prompt
    fn generate_image(&self, prompt: &str) -> Result<()>;

    /// Play something on YouTube
    fn play_media(&self, query: &str) -> Result<()> {
        self.open(&youtube_search_url(query))
    }
}

pub fn youtube_search_url(query: &str) -> String {
    format!(
        "https://www.youtube.com/results?search_query={}",
        urlencoding::encode(query)
    )
}

/// Desktop backed by the host's command-line tools
pub struct SystemDesktop {
    image_command: Vec<String>,
}

impl SystemDesktop {
    /// `image_command` is the generator program followed by its fixed args;
    /// the prompt is appended as the last argument.
    pub fn new(image_command: Vec<String>) -> Self {
        Self { image_command }
    }
}

impl Desktop for SystemDesktop {
    fn screenshot(&self, dest: &Path) -> Result<()> {
        let dest = dest.to_string_lossy().into_owned();
        let dest = dest.as_str();

        if cfg!(target_os = "macos") {
            return run("screencapture", &["-x", dest]);
        }
        if cfg!(target_os = "windows") {
            return Err(JarvisError::Unsupported("screenshot".to_string()));
        }

        // Whichever capture tool is installed wins
        let candidates: [(&str, Vec<&str>); 3] = [
            ("gnome-screenshot", vec!["-f", dest]),
            ("grim", vec![dest]),
            ("scrot", vec!["-o", dest]),
        ];
        let mut last_err = None;
        for (program, args) in candidates.iter() {
            match run(program, args) {
                Ok(()) => return Ok(()),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| JarvisError::Unsupported("screenshot".to_string())))
    }

    fn change_volume(&self, step: Step) -> Result<()> {
        if cfg!(target_os = "macos") {
            let sign = match step {
                Step::Up => "+",
                Step::Down => "-",
            };
            let script = format!(
                "set volume output volume ((output volume of (get volume settings)) {} 10)",
                sign
            );
            return run("osascript", &["-e", script.as_str()]);
        }
        if cfg!(target_os = "windows") {
            // 175/174 are the media volume keys; five presses like a keyboard would
            let key = match step {
                Step::Up => 175,
                Step::Down => 174,
            };
            let script = format!(
                "$s = New-Object -ComObject WScript.Shell; 1..5 | ForEach-Object {{ $s.SendKeys([char]{}) }}",
                key
            );
            return run("powershell", &["-NoProfile", "-Command", script.as_str()]);
        }

        let delta = match step {
            Step::Up => "+10%",
            Step::Down => "-10%",
        };
        run("pactl", &["set-sink-volume", "@DEFAULT_SINK@", delta])
    }

    fn change_brightness(&self, step: Step) -> Result<()> {
        if cfg!(target_os = "linux") {
            let delta = match step {
                Step::Up => "+10%",
                Step::Down => "10%-",
            };
            return run("brightnessctl", &["set", delta]);
        }
        Err(JarvisError::Unsupported("brightness control".to_string()))
    }

    fn open(&self, target: &str) -> Result<()> {
        if cfg!(target_os = "macos") {
            run("open", &[target])
        } else if cfg!(target_os = "windows") {
            run("cmd", &["/C", "start", "", target])
        } else {
            run("xdg-open", &[target])
        }
    }

    fn launch(&self, program: &Path) -> Result<()> {
        debug!("Spawning {}", program.display());
        // Detached: the app outlives us, so the child handle is dropped unwaited
        let _child = Command::new(program).spawn()?;
        Ok(())
    }

    fn generate_image(&self, prompt: &str) -> Result<()> {
        let Some((program, args)) = self.image_command.split_first() else {
            return Err(JarvisError::Config(
                "no image generator command configured".to_string(),
            ));
        };

        let status = Command::new(program).args(args).arg(prompt).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(JarvisError::Capability(format!(
                "{} exited with {}",
                program, status
            )))
        }
    }
}

fn run(program: &str, args: &[&str]) -> Result<()> {
    debug!("Running {} {:?}", program, args);
    let status = Command::new(program).args(args).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(JarvisError::Capability(format!(
            "{} exited with {}",
            program, status
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_search_url_is_encoded() {
        let url = youtube_search_url("lo-fi beats & rain");
        assert_eq!(
            url,
            "https://www.youtube.com/results?search_query=lo-fi%20beats%20%26%20rain"
        );
    }

    #[test]
    fn test_generate_image_without_command() {
        let desktop = SystemDesktop::new(Vec::new());
        let result = desktop.generate_image("a cat");
        assert!(matches!(result, Err(JarvisError::Config(_))));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_launch_returns_without_waiting() {
        let desktop = SystemDesktop::new(Vec::new());
        assert!(desktop.launch(Path::new("/bin/true")).is_ok());
    }

    #[test]
    fn test_launch_missing_program_fails() {
        let desktop = SystemDesktop::new(Vec::new());
        let result = desktop.launch(Path::new("/definitely/not/a/real/program"));
        assert!(matches!(result, Err(JarvisError::Io(_))));
    }
}
