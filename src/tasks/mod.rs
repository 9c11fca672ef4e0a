//! Built-in tasks

pub mod echo;
pub mod exec;
pub mod fail;
pub mod fileset;
pub mod property;
pub mod sleep;

use crate::runner::TaskRegistry;

pub use echo::EchoTask;
pub use exec::ExecTask;
pub use fail::FailTask;
pub use fileset::FileSetTask;
pub use property::PropertyTask;
pub use sleep::SleepTask;

/// Register every built-in task
pub fn register_builtins(registry: &mut TaskRegistry) {
    registry.register("echo", echo::create);
    registry.register("exec", exec::create);
    registry.register("fail", fail::create);
    registry.register("fileset", fileset::create);
    registry.register("property", property::create);
    registry.register("sleep", sleep::create);
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::expr::BuildInfo;
    use crate::runner::{BuildOptions, Project};

    /// Build information for running a task outside a build
    pub struct Standalone;

    impl BuildInfo for Standalone {
        fn project_name(&self) -> &str {
            "test"
        }

        fn default_target(&self) -> Option<&str> {
            None
        }

        fn has_target(&self, _name: &str) -> bool {
            false
        }

        fn has_executed(&self, _name: &str) -> bool {
            false
        }

        fn current_target(&self) -> Option<&str> {
            Some("test")
        }
    }

    pub fn project(base_dir: &std::path::Path) -> Project {
        Project::new("test", base_dir).unwrap()
    }

    pub fn quiet() -> BuildOptions {
        BuildOptions::new().with_verbosity(crate::runner::Verbosity::Silent)
    }
}
