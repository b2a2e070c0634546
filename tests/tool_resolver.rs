// tests/tool_resolver.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use toolrun::errors::ToolrunError;
use toolrun::tool::{
    CommandProbe, InvocationForm, ProbeVerdict, ToolProbe, ToolResolver, resolve_form,
    resolve_with_probe,
};
use toolrun::tools::compose_candidates;
use toolrun_test_utils::builders::{failed, succeeded};
use toolrun_test_utils::fake_executor::ScriptedExecutor;

/// Probe that approves a fixed set of forms and counts how often it ran.
struct AllowList {
    supported: HashSet<InvocationForm>,
    probed: Mutex<Vec<InvocationForm>>,
}

impl AllowList {
    fn new(supported: &[InvocationForm]) -> Self {
        Self {
            supported: supported.iter().cloned().collect(),
            probed: Mutex::new(Vec::new()),
        }
    }

    fn probed(&self) -> Vec<InvocationForm> {
        self.probed.lock().unwrap().clone()
    }
}

impl ToolProbe for AllowList {
    fn probe<'a>(
        &'a self,
        form: &'a InvocationForm,
    ) -> Pin<Box<dyn Future<Output = ProbeVerdict> + Send + 'a>> {
        self.probed.lock().unwrap().push(form.clone());
        let verdict = if self.supported.contains(form) {
            ProbeVerdict::Supported
        } else {
            ProbeVerdict::Inconclusive {
                reason: "not on the allow list".to_string(),
            }
        };
        Box::pin(async move { verdict })
    }
}

fn plugin() -> InvocationForm {
    InvocationForm::integrated("docker", "compose")
}

fn legacy() -> InvocationForm {
    InvocationForm::standalone("docker-compose")
}

#[test]
fn first_supported_candidate_wins() {
    let chosen = resolve_form(&[plugin(), legacy()], |_| true).unwrap();
    assert_eq!(chosen, plugin());
}

#[test]
fn failing_preferred_probe_selects_the_next_candidate() {
    let chosen = resolve_form(&[plugin(), legacy()], |form| *form == legacy()).unwrap();
    assert_eq!(chosen, legacy());
}

#[test]
fn all_probes_failing_falls_back_to_the_legacy_form() {
    init_tracing();

    let mut probed = Vec::new();
    let chosen = resolve_form(&[plugin(), legacy()], |form| {
        probed.push(form.clone());
        false
    })
    .unwrap();

    assert_eq!(chosen, legacy());
    assert_eq!(probed, vec![plugin(), legacy()]);
}

#[test]
fn later_candidates_are_not_probed_once_one_succeeds() {
    let mut probed = 0;
    resolve_form(&[plugin(), legacy()], |_| {
        probed += 1;
        true
    })
    .unwrap();
    assert_eq!(probed, 1);
}

#[test]
fn empty_candidate_list_is_an_error() {
    let result = resolve_form(&[], |_| true);
    assert!(matches!(result, Err(ToolrunError::NoCandidateForms)));
}

#[test]
fn single_candidate_is_returned_even_if_probe_fails() {
    let chosen = resolve_form(&[legacy()], |_| false).unwrap();
    assert_eq!(chosen, legacy());
}

#[tokio::test]
async fn async_resolution_follows_the_same_rules() {
    let probe = AllowList::new(&[legacy()]);
    let chosen = with_timeout(resolve_with_probe(&[plugin(), legacy()], &probe))
        .await
        .unwrap();
    assert_eq!(chosen, legacy());

    let nothing = AllowList::new(&[]);
    let chosen = resolve_with_probe(&[plugin(), legacy()], &nothing).await.unwrap();
    assert_eq!(chosen, legacy());

    let empty = resolve_with_probe(&[], &nothing).await;
    assert!(matches!(empty, Err(ToolrunError::NoCandidateForms)));
}

#[tokio::test]
async fn resolver_probes_only_once() {
    let resolver = ToolResolver::new(vec![plugin(), legacy()]);
    let probe = AllowList::new(&[plugin()]);

    assert!(resolver.resolved().is_none());

    for _ in 0..3 {
        let form = resolver.resolve(&probe).await.unwrap();
        assert_eq!(*form, plugin());
    }

    assert_eq!(probe.probed(), vec![plugin()]);
    assert_eq!(resolver.resolved(), Some(&plugin()));
}

#[tokio::test]
async fn resolver_keeps_its_answer_when_the_environment_changes() {
    let resolver = ToolResolver::new(vec![plugin(), legacy()]);

    let first = resolver.resolve(&AllowList::new(&[legacy()])).await.unwrap();
    assert_eq!(*first, legacy());

    // A later probe that would prefer the plugin is never consulted.
    let later = AllowList::new(&[plugin()]);
    let second = resolver.resolve(&later).await.unwrap();
    assert_eq!(*second, legacy());
    assert!(later.probed().is_empty());
}

#[tokio::test]
async fn command_probe_runs_version_check_through_the_executor() {
    let executor = ScriptedExecutor::new(vec![
        failed(1, "'compose' is not a docker command"),
        succeeded("docker-compose version 1.29.2"),
    ]);
    let probe = CommandProbe::new(&executor);

    let chosen = resolve_with_probe(&compose_candidates(), &probe).await.unwrap();

    assert_eq!(chosen, legacy());
    let lines: Vec<String> = executor.calls().iter().map(|c| c.command_line()).collect();
    assert_eq!(lines, vec!["docker compose version", "docker-compose version"]);
    assert!(executor.calls().iter().all(|c| c.tag == "probe"));
}

#[tokio::test]
async fn command_probe_treats_spawn_failure_as_inconclusive() {
    let executor = ScriptedExecutor::failing_to_spawn("No such file or directory");
    let probe = CommandProbe::new(&executor).with_version_arg("--version");

    let verdict = probe.probe(&legacy()).await;

    assert!(!verdict.is_supported());
    assert_eq!(executor.calls()[0].command_line(), "docker-compose --version");
}

#[test]
fn forms_describe_their_invocation() {
    assert_eq!(plugin().binary(), "docker");
    assert_eq!(plugin().leading_args(), vec!["compose"]);
    assert_eq!(plugin().to_string(), "docker compose");
    assert_eq!(legacy().binary(), "docker-compose");
    assert!(legacy().leading_args().is_empty());
    assert_eq!(legacy().probe_args("version"), vec!["version"]);
}
