//! Executing action plans.
//!
//! [`dispatch`] is the single entry point the binary calls: establish the
//! context, plan the request, then run the plan's actions in order. The
//! first failing action ends the invocation.

use crate::builder::bootstrap::ToolchainBootstrapper;
use crate::builder::build_dir::BuildDirectoryManager;
use crate::builder::cmake::CMakeBackend;
use crate::core::command::{CommandKind, CommandRequest};
use crate::core::context::BuildContext;
use crate::core::errors::Result;
use crate::core::platform::HostPlatform;
use crate::ops::addr2line::addr2line;
use crate::ops::plan::{plan, Action, ActionPlan};
use crate::ops::run::{debug_executable, run_executable};
use crate::ops::test::run_tests;
use crate::util::config::EnvConfig;
use crate::util::process::ProcessRunner;
use crate::util::shell::{Shell, Status};

/// Runs the actions of a plan against one context.
pub struct Dispatcher<'a> {
    ctx: &'a BuildContext,
    env: &'a EnvConfig,
    runner: &'a dyn ProcessRunner,
    shell: &'a Shell,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        ctx: &'a BuildContext,
        env: &'a EnvConfig,
        runner: &'a dyn ProcessRunner,
        shell: &'a Shell,
    ) -> Self {
        Dispatcher {
            ctx,
            env,
            runner,
            shell,
        }
    }

    /// Run every action in order, stopping at the first failure.
    pub fn execute(&self, plan: &ActionPlan) -> Result<()> {
        tracing::debug!(
            "{} {}: {} action(s)",
            plan.command,
            plan.target,
            plan.actions.len()
        );

        for action in &plan.actions {
            self.execute_action(action)?;
        }

        if plan.command == CommandKind::Test
            && !plan.actions.iter().any(|a| matches!(a, Action::Test { .. }))
        {
            self.shell.status(
                Status::Skipped,
                format!("tests (only run for `{}`)", self.ctx.settings().test_target),
            );
        }

        self.shell.status(Status::Finished, format!("`{}`", plan.command));
        Ok(())
    }

    fn execute_action(&self, action: &Action) -> Result<()> {
        tracing::trace!("action: {:?}", action);

        match action {
            Action::Destroy => {
                BuildDirectoryManager::new(self.ctx, self.runner, self.shell).destroy()?;
            }
            Action::Bootstrap => {
                ToolchainBootstrapper::new(self.ctx, self.env, self.runner, self.shell)
                    .bootstrap()?;
            }
            Action::EnsureConfigured => {
                BuildDirectoryManager::new(self.ctx, self.runner, self.shell)
                    .ensure_configured()?;
            }
            Action::Build { target } => {
                let what = target.as_deref().unwrap_or("default targets");
                self.shell.status(Status::Building, what);
                CMakeBackend::new(self.ctx, self.runner).build(target.as_deref())?;
            }
            Action::Run { executable, args } => {
                self.shell.status(Status::Running, executable);
                run_executable(self.ctx, self.runner, executable, args)?;
            }
            Action::Debug { executable, args } => {
                self.shell.status(Status::Running, format!("gdb {}", executable));
                debug_executable(self.ctx, self.runner, executable, args)?;
            }
            Action::Test { filter } => {
                match filter {
                    Some(filter) => self.shell.status(Status::Testing, format!("matching `{}`", filter)),
                    None => self.shell.status(Status::Testing, "all"),
                }
                run_tests(self.ctx, self.runner, filter.as_deref())?;
            }
            Action::Addr2line { binary, addresses } => {
                addr2line(self.ctx, self.runner, binary, addresses)?;
            }
        }
        Ok(())
    }
}

/// Establish the context for `request` and return its plan without running
/// anything.
pub fn preview(
    request: &CommandRequest,
    env: &EnvConfig,
    platform: HostPlatform,
    runner: &dyn ProcessRunner,
) -> Result<ActionPlan> {
    let ctx = BuildContext::establish(env, platform, runner)?;
    Ok(plan(request, &ctx)?)
}

/// Establish the context, plan the request and execute the plan.
pub fn dispatch(
    request: &CommandRequest,
    env: &EnvConfig,
    platform: HostPlatform,
    runner: &dyn ProcessRunner,
    shell: &Shell,
) -> Result<()> {
    let ctx = BuildContext::establish(env, platform, runner)?;
    let plan = plan(request, &ctx)?;

    tracing::info!(
        "{} with preset {} in {}",
        plan.command,
        ctx.preset().name,
        ctx.build_dir().display()
    );

    Dispatcher::new(&ctx, env, runner, shell).execute(&plan)
}
