//! Per-command action plans.
//!
//! Planning is pure: it looks at the request and the context and returns the
//! ordered list of actions to run. Nothing is executed here, which is what
//! makes `--plan` and the plan tests possible.

use serde::Serialize;

use crate::core::command::{CommandKind, CommandRequest};
use crate::core::context::BuildContext;
use crate::core::errors::ConfigurationError;

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    /// Remove the build directory and generated fragment.
    Destroy,
    /// Run the dependency bootstrap.
    Bootstrap,
    /// Configure the build directory if it is not already.
    EnsureConfigured,
    /// Build one target, or the default targets.
    Build { target: Option<String> },
    /// Run a built executable.
    Run { executable: String, args: Vec<String> },
    /// Start a built executable under gdb.
    Debug { executable: String, args: Vec<String> },
    /// Run the unit tests, optionally filtered by name.
    Test { filter: Option<String> },
    /// Resolve addresses in a built binary.
    Addr2line { binary: String, addresses: Vec<String> },
}

impl Action {
    fn build(target: Option<&str>) -> Self {
        Action::Build {
            target: target.map(str::to_string),
        }
    }
}

/// The resolved plan for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionPlan {
    pub command: CommandKind,
    pub target: String,
    pub actions: Vec<Action>,
}

/// Work out what a request does.
pub fn plan(request: &CommandRequest, ctx: &BuildContext) -> Result<ActionPlan, ConfigurationError> {
    let command = request.command;
    let settings = ctx.settings();

    if command.requires_target() && request.target.is_none() {
        return Err(ConfigurationError::MissingTarget {
            command: command.to_string(),
            usage: command.usage().to_string(),
        });
    }
    let target = ctx.resolve_target(request.target.as_deref());

    let mut actions = match command {
        CommandKind::Delete => {
            return Ok(ActionPlan {
                command,
                target,
                actions: vec![Action::Destroy],
            })
        }
        CommandKind::Rebuild | CommandKind::Recreate if settings.fresh_rebuild => {
            vec![Action::Destroy, Action::Bootstrap, Action::EnsureConfigured]
        }
        _ => vec![Action::Bootstrap, Action::EnsureConfigured],
    };

    match command {
        CommandKind::Build | CommandKind::Rebuild => {
            actions.push(Action::build(None));
        }
        CommandKind::Install => {
            actions.push(Action::build(None));
            actions.push(Action::build(Some("install")));
        }
        CommandKind::Run => {
            actions.push(Action::build(Some(&target)));
            actions.push(Action::Run {
                executable: target.clone(),
                args: request.args.clone(),
            });
        }
        CommandKind::Gdb => {
            actions.push(Action::build(Some(&target)));
            actions.push(Action::Debug {
                executable: target.clone(),
                args: request.args.clone(),
            });
        }
        CommandKind::Test => {
            actions.push(Action::build(None));
            if target == settings.test_target {
                actions.push(Action::Test {
                    filter: request.args.first().cloned(),
                });
            } else {
                tracing::debug!(
                    "target '{}' is not '{}'; not running tests",
                    target,
                    settings.test_target
                );
            }
        }
        CommandKind::Addr2line => {
            if request.args.is_empty() {
                return Err(ConfigurationError::MissingArgument {
                    command: command.to_string(),
                    what: "at least one address".to_string(),
                    usage: command.usage().to_string(),
                });
            }
            actions.push(Action::build(Some(&target)));
            actions.push(Action::Addr2line {
                binary: target.clone(),
                addresses: request.args.clone(),
            });
        }
        CommandKind::Recreate | CommandKind::Vcpkg | CommandKind::Delete => {}
    }

    Ok(ActionPlan {
        command,
        target,
        actions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::HostPlatform;
    use crate::test_support;
    use crate::util::config::ProjectSettings;
    use std::path::Path;

    fn ctx() -> BuildContext {
        test_support::context(Path::new("/src/ladybird"))
    }

    fn actions(request: CommandRequest) -> Vec<Action> {
        plan(&request, &ctx()).unwrap().actions
    }

    fn build(target: Option<&str>) -> Action {
        Action::build(target)
    }

    #[test]
    fn test_build_plan() {
        assert_eq!(
            actions(CommandRequest::new(CommandKind::Build)),
            vec![Action::Bootstrap, Action::EnsureConfigured, build(None)]
        );
    }

    #[test]
    fn test_install_plan() {
        assert_eq!(
            actions(CommandRequest::new(CommandKind::Install)),
            vec![
                Action::Bootstrap,
                Action::EnsureConfigured,
                build(None),
                build(Some("install"))
            ]
        );
    }

    #[test]
    fn test_run_plan_passes_args_through() {
        let request = CommandRequest::new(CommandKind::Run)
            .with_target("js")
            .with_args(["-A", "script;with;semicolons.js"]);

        assert_eq!(
            actions(request),
            vec![
                Action::Bootstrap,
                Action::EnsureConfigured,
                build(Some("js")),
                Action::Run {
                    executable: "js".to_string(),
                    args: vec!["-A".to_string(), "script;with;semicolons.js".to_string()],
                }
            ]
        );
    }

    #[test]
    fn test_gdb_plan() {
        let request = CommandRequest::new(CommandKind::Gdb)
            .with_target("WebContent")
            .with_args(["-ex", "run"]);

        let plan = actions(request);
        assert_eq!(plan[2], build(Some("WebContent")));
        assert_eq!(
            plan[3],
            Action::Debug {
                executable: "WebContent".to_string(),
                args: vec!["-ex".to_string(), "run".to_string()],
            }
        );
    }

    #[test]
    fn test_run_requires_target() {
        let err = plan(&CommandRequest::new(CommandKind::Run), &ctx()).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingTarget { ref command, .. } if command == "run"));
    }

    #[test]
    fn test_test_plan_with_aggregate_target() {
        let request = CommandRequest::new(CommandKind::Test)
            .with_target("lagom")
            .with_args(["Foo"]);

        assert_eq!(
            actions(request),
            vec![
                Action::Bootstrap,
                Action::EnsureConfigured,
                build(None),
                Action::Test {
                    filter: Some("Foo".to_string())
                }
            ]
        );
    }

    #[test]
    fn test_test_plan_without_filter() {
        let request = CommandRequest::new(CommandKind::Test).with_target("lagom");
        assert_eq!(
            actions(request).last(),
            Some(&Action::Test { filter: None })
        );
    }

    #[test]
    fn test_test_plan_other_target_only_builds() {
        // Without a target the architecture default applies, which is not the
        // aggregate test target.
        assert_eq!(
            actions(CommandRequest::new(CommandKind::Test)),
            vec![Action::Bootstrap, Action::EnsureConfigured, build(None)]
        );
    }

    #[test]
    fn test_delete_plan_only_destroys() {
        assert_eq!(
            actions(CommandRequest::new(CommandKind::Delete)),
            vec![Action::Destroy]
        );
    }

    #[test]
    fn test_rebuild_and_recreate_destroy_first() {
        assert_eq!(
            actions(CommandRequest::new(CommandKind::Rebuild)),
            vec![
                Action::Destroy,
                Action::Bootstrap,
                Action::EnsureConfigured,
                build(None)
            ]
        );
        assert_eq!(
            actions(CommandRequest::new(CommandKind::Recreate)),
            vec![Action::Destroy, Action::Bootstrap, Action::EnsureConfigured]
        );
    }

    #[test]
    fn test_rebuild_without_fresh_rebuild_keeps_directory() {
        let settings = ProjectSettings {
            fresh_rebuild: false,
            ..Default::default()
        };
        let ctx = test_support::context_with(Path::new("/src/ladybird"), HostPlatform::Linux, settings);

        let plan = plan(&CommandRequest::new(CommandKind::Rebuild), &ctx).unwrap();
        assert_eq!(
            plan.actions,
            vec![Action::Bootstrap, Action::EnsureConfigured, build(None)]
        );
    }

    #[test]
    fn test_vcpkg_plan() {
        assert_eq!(
            actions(CommandRequest::new(CommandKind::Vcpkg)),
            vec![Action::Bootstrap, Action::EnsureConfigured]
        );
    }

    #[test]
    fn test_addr2line_plan() {
        let request = CommandRequest::new(CommandKind::Addr2line)
            .with_target("RequestServer")
            .with_args(["0x12345678"]);

        assert_eq!(
            actions(request).last(),
            Some(&Action::Addr2line {
                binary: "RequestServer".to_string(),
                addresses: vec!["0x12345678".to_string()],
            })
        );

        let missing = CommandRequest::new(CommandKind::Addr2line).with_target("RequestServer");
        assert!(matches!(
            plan(&missing, &ctx()),
            Err(ConfigurationError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_every_command_bootstraps_before_building() {
        for command in CommandKind::ALL {
            let request = CommandRequest::new(command)
                .with_target("lagom")
                .with_args(["0x10"]);
            let actions = plan(&request, &ctx()).unwrap().actions;

            let bootstrap = actions.iter().position(|a| *a == Action::Bootstrap);
            let configure = actions.iter().position(|a| *a == Action::EnsureConfigured);
            let first_build = actions.iter().position(|a| matches!(a, Action::Build { .. }));

            if command == CommandKind::Delete {
                assert_eq!((bootstrap, configure), (None, None));
                continue;
            }
            let (bootstrap, configure) = (bootstrap.unwrap(), configure.unwrap());
            assert!(bootstrap < configure, "{command}");
            if let Some(build) = first_build {
                assert!(configure < build, "{command}");
            }
        }
    }

    #[test]
    fn test_plan_serializes() {
        let plan = plan(&CommandRequest::new(CommandKind::Install), &ctx()).unwrap();
        let json = serde_json::to_value(&plan).unwrap();

        assert_eq!(json["command"], "install");
        assert_eq!(json["target"], "x86_64");
        assert_eq!(json["actions"][0]["action"], "bootstrap");
        assert_eq!(json["actions"][3]["action"], "build");
        assert_eq!(json["actions"][3]["target"], "install");
    }
}
