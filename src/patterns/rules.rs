use super::signals::{
    at_least, combine, has_wait_group, launch_channel_ratio, present, semaphore_capacity,
    unbuffered_share, unit_element,
};
use crate::core::{ConcurrencyFacts, PatternInstance, PatternKind};
use std::path::Path;

/// One scored pattern rule.
///
/// Rules read the facts and never modify them, so they can run in any order.
pub trait PatternRule: Send + Sync {
    fn kind(&self) -> PatternKind;

    fn evaluate(&self, file: &Path, facts: &ConcurrencyFacts) -> Vec<PatternInstance>;
}

/// Every built-in rule, in [`PatternKind::ALL`] order.
pub fn builtin_rules() -> Vec<Box<dyn PatternRule>> {
    PatternKind::ALL.iter().map(|kind| rule_for(*kind)).collect()
}

pub fn rule_for(kind: PatternKind) -> Box<dyn PatternRule> {
    match kind {
        PatternKind::WorkerPool => Box::new(WorkerPoolRule),
        PatternKind::Pipeline => Box::new(PipelineRule),
        PatternKind::FanOut => Box::new(FanOutRule),
        PatternKind::FanIn => Box::new(FanInRule),
        PatternKind::Semaphore => Box::new(SemaphoreRule),
    }
}

fn first_launch_line(facts: &ConcurrencyFacts) -> usize {
    facts.launches.iter().map(|l| l.line).min().unwrap_or(0)
}

fn first_channel_line(facts: &ConcurrencyFacts) -> usize {
    facts.channels.iter().map(|c| c.line).min().unwrap_or(0)
}

/// Tasks pulling work from a shared channel, joined with a wait group.
pub struct WorkerPoolRule;

impl PatternRule for WorkerPoolRule {
    fn kind(&self) -> PatternKind {
        PatternKind::WorkerPool
    }

    fn evaluate(&self, file: &Path, facts: &ConcurrencyFacts) -> Vec<PatternInstance> {
        let launches = facts.launches.len();
        let channels = facts.channels.len();
        let wait_group = has_wait_group(facts);
        if launches == 0 || channels == 0 || !wait_group {
            return Vec::new();
        }

        let confidence = combine(&[
            at_least(launches, 2, 0.3),
            at_least(launches, 3, 0.2),
            present(channels > 0, 0.3),
            present(wait_group, 0.3),
        ]);

        vec![PatternInstance::new(
            self.kind(),
            file,
            first_launch_line(facts),
            confidence,
            format!(
                "{launches} task launch(es) sharing {channels} channel(s), joined by a wait group"
            ),
            "for i := 0; i < n; i++ { wg.Add(1); go worker(jobs, &wg) }; wg.Wait()",
        )]
    }
}

/// Stages connected by channels, each stage running as its own task.
pub struct PipelineRule;

impl PatternRule for PipelineRule {
    fn kind(&self) -> PatternKind {
        PatternKind::Pipeline
    }

    fn evaluate(&self, file: &Path, facts: &ConcurrencyFacts) -> Vec<PatternInstance> {
        let launches = facts.launches.len();
        let channels = facts.channels.len();
        if channels < 2 || launches < 2 {
            return Vec::new();
        }

        let confidence = combine(&[
            at_least(channels, 2, 0.3),
            at_least(launches, 2, 0.3),
            unbuffered_share(facts, 0.7, 0.3),
            at_least(channels, 3, 0.2),
        ]);
        if confidence <= 0.6 {
            return Vec::new();
        }

        vec![PatternInstance::new(
            self.kind(),
            file,
            first_channel_line(facts),
            confidence,
            format!("{channels} channels linking {launches} concurrent stages"),
            "out := stage2(stage1(in))",
        )]
    }
}

/// Many tasks consuming from few channels.
pub struct FanOutRule;

impl PatternRule for FanOutRule {
    fn kind(&self) -> PatternKind {
        PatternKind::FanOut
    }

    fn evaluate(&self, file: &Path, facts: &ConcurrencyFacts) -> Vec<PatternInstance> {
        let launches = facts.launches.len();
        let channels = facts.channels.len();
        if launches < 3 || channels == 0 {
            return Vec::new();
        }

        let confidence = combine(&[
            launch_channel_ratio(launches, channels),
            at_least(launches, 3, 0.3),
            unbuffered_share(facts, 0.5, 0.2),
            present(channels <= 2 && launches >= 4, 0.3),
        ]);
        if confidence <= 0.6 {
            return Vec::new();
        }

        vec![PatternInstance::new(
            self.kind(),
            file,
            first_launch_line(facts),
            confidence,
            format!("{launches} tasks distributing work from {channels} channel(s)"),
            "for i := 0; i < n; i++ { go process(in) }",
        )]
    }
}

/// Several producers merging into at most two channels.
pub struct FanInRule;

impl PatternRule for FanInRule {
    fn kind(&self) -> PatternKind {
        PatternKind::FanIn
    }

    fn evaluate(&self, file: &Path, facts: &ConcurrencyFacts) -> Vec<PatternInstance> {
        let launches = facts.launches.len();
        let channels = facts.channels.len();
        if launches < 3 || channels > 2 {
            return Vec::new();
        }

        let confidence = combine(&[
            0.4,
            at_least(launches, 4, 0.3),
            present(channels == 1, 0.3),
            unbuffered_share(facts, 0.5, 0.2),
        ]);
        if confidence <= 0.6 {
            return Vec::new();
        }

        let line = if channels == 0 {
            first_launch_line(facts)
        } else {
            first_channel_line(facts)
        };
        vec![PatternInstance::new(
            self.kind(),
            file,
            line,
            confidence,
            format!("{launches} producers merging into {channels} channel(s)"),
            "for _, c := range inputs { go func(c <-chan T) { for v := range c { out <- v } }(c) }",
        )]
    }
}

/// Buffered channels used as counting semaphores.
pub struct SemaphoreRule;

impl PatternRule for SemaphoreRule {
    fn kind(&self) -> PatternKind {
        PatternKind::Semaphore
    }

    fn evaluate(&self, file: &Path, facts: &ConcurrencyFacts) -> Vec<PatternInstance> {
        facts
            .channels
            .iter()
            .filter(|channel| channel.buffered && channel.buffer_size > 1)
            .filter_map(|channel| {
                let confidence = combine(&[
                    present(channel.buffered, 0.4),
                    unit_element(channel),
                    semaphore_capacity(channel.buffer_size),
                ]);
                (confidence > 0.5).then(|| {
                    PatternInstance::new(
                        self.kind(),
                        file,
                        channel.line,
                        confidence,
                        format!(
                            "buffered chan {} with capacity {} limiting concurrency",
                            channel.element_type, channel.buffer_size
                        ),
                        "sem := make(chan struct{}, n); sem <- struct{}{}; defer func() { <-sem }()",
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        CalleeKind, ChannelDirection, ChannelFact, SyncKind, SyncPrimitiveFact, TaskLaunch,
    };
    use std::path::PathBuf;

    fn launch(line: usize) -> TaskLaunch {
        TaskLaunch {
            file: PathBuf::from("p.go"),
            line,
            callee_kind: CalleeKind::Named,
            callee_name: "worker".into(),
            context_snippet: String::new(),
        }
    }

    fn channel(line: usize, buffer_size: usize, unit_element: bool) -> ChannelFact {
        ChannelFact {
            file: PathBuf::from("p.go"),
            line,
            enclosing_function: None,
            element_type: if unit_element { "struct{}" } else { "int" }.into(),
            unit_element,
            buffered: buffer_size > 0,
            buffer_size,
            direction: ChannelDirection::Bidirectional,
        }
    }

    fn wait_group() -> SyncPrimitiveFact {
        SyncPrimitiveFact {
            file: PathBuf::from("p.go"),
            line: 1,
            enclosing_function: None,
            kind: SyncKind::WaitGroup,
            variable_name: "wg".into(),
        }
    }

    fn facts(launches: usize, channels: Vec<ChannelFact>, wg: bool) -> ConcurrencyFacts {
        ConcurrencyFacts {
            launches: (0..launches).map(|i| launch(10 + i)).collect(),
            channels,
            sync_primitives: if wg { vec![wait_group()] } else { vec![] },
            leak_risks: vec![],
        }
    }

    fn score(rule: &dyn PatternRule, facts: &ConcurrencyFacts) -> Option<f64> {
        rule.evaluate(Path::new("p.go"), facts)
            .first()
            .map(PatternInstance::confidence)
    }

    #[test]
    fn test_worker_pool_full_confidence() {
        let f = facts(3, vec![channel(5, 0, false)], true);
        let instances = WorkerPoolRule.evaluate(Path::new("p.go"), &f);
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].confidence(), 1.0);
        assert_eq!(instances[0].line(), 10);
    }

    #[test]
    fn test_worker_pool_single_launch_still_reported() {
        let f = facts(1, vec![channel(5, 0, false)], true);
        let confidence = score(&WorkerPoolRule, &f).unwrap();
        assert!((confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_worker_pool_requires_wait_group() {
        let f = facts(3, vec![channel(5, 0, false)], false);
        assert_eq!(score(&WorkerPoolRule, &f), None);
    }

    #[test]
    fn test_pipeline_with_unbuffered_stages() {
        let f = facts(2, vec![channel(3, 0, false), channel(4, 0, false)], false);
        let confidence = score(&PipelineRule, &f).unwrap();
        assert!((confidence - 0.9).abs() < 1e-9);
        assert_eq!(PipelineRule.evaluate(Path::new("p.go"), &f)[0].line(), 3);
    }

    #[test]
    fn test_pipeline_buffered_is_rejected() {
        let f = facts(2, vec![channel(3, 5, false), channel(4, 5, false)], false);
        assert_eq!(score(&PipelineRule, &f), None);
    }

    #[test]
    fn test_fan_out_many_launches_one_channel() {
        let f = facts(4, vec![channel(3, 0, false)], false);
        assert_eq!(score(&FanOutRule, &f), Some(1.0));
    }

    #[test]
    fn test_fan_out_needs_three_launches() {
        let f = facts(2, vec![channel(3, 0, false)], false);
        assert_eq!(score(&FanOutRule, &f), None);
    }

    #[test]
    fn test_fan_in_single_channel() {
        let f = facts(3, vec![channel(3, 0, false)], false);
        let confidence = score(&FanInRule, &f).unwrap();
        assert!((confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_fan_in_without_channels() {
        let f = facts(4, vec![], false);
        let instances = FanInRule.evaluate(Path::new("p.go"), &f);
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].confidence(), 0.7);
        assert_eq!(instances[0].line(), 10);
    }

    #[test]
    fn test_fan_in_three_launches_without_channels_is_rejected() {
        // 0.4 base only.
        let f = facts(3, vec![], false);
        assert_eq!(score(&FanInRule, &f), None);
    }

    #[test]
    fn test_fan_in_score_of_exactly_point_six_is_rejected() {
        // 0.4 base + 0.2 unbuffered; two channels and three launches add nothing else.
        let f = facts(3, vec![channel(3, 0, false), channel(4, 0, false)], false);
        assert_eq!(score(&FanInRule, &f), None);
    }

    #[test]
    fn test_pipeline_score_is_exact() {
        let f = facts(3, vec![channel(3, 0, false), channel(4, 0, false)], false);
        assert_eq!(score(&PipelineRule, &f), Some(0.9));
    }

    #[test]
    fn test_fan_in_rejects_many_channels() {
        let f = facts(
            5,
            vec![channel(1, 0, false), channel(2, 0, false), channel(3, 0, false)],
            false,
        );
        assert_eq!(score(&FanInRule, &f), None);
    }

    #[test]
    fn test_semaphore_per_buffered_channel() {
        let f = facts(
            0,
            vec![
                channel(3, 5, true),
                channel(4, 1, true),
                channel(5, 0, true),
                channel(6, 100, false),
            ],
            false,
        );
        let instances = SemaphoreRule.evaluate(Path::new("p.go"), &f);
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].line(), 3);
        assert_eq!(instances[0].confidence(), 1.0);
    }

    #[test]
    fn test_semaphore_small_capacity_without_unit_element() {
        let f = facts(0, vec![channel(3, 4, false)], false);
        let confidence = score(&SemaphoreRule, &f).unwrap();
        assert!((confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_semaphore_score_of_exactly_half_is_rejected() {
        // 0.4 buffered + 0.1 large capacity, no unit element.
        let f = facts(0, vec![channel(3, 64, false)], false);
        assert_eq!(score(&SemaphoreRule, &f), None);
    }

    #[test]
    fn test_builtin_rules_cover_all_kinds() {
        let kinds: Vec<_> = builtin_rules().iter().map(|r| r.kind()).collect();
        assert_eq!(kinds, PatternKind::ALL.to_vec());
    }
}
