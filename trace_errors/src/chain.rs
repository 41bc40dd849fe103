//! Cause-chain traversal and trace assembly.
//!
//! Errors in a chain are one of two kinds: a [`TraceError`] node, whose cause
//! and location this crate understands, or a foreign error, which ends the
//! traversal. [`Link::classify`] is the single place that tells them apart.
//!
//! A node owns its cause, so a chain cannot loop back on itself. Traversal is
//! still capped at [`TraceConfig::max_depth`] links.

use std::error::Error;

use tracing::warn;

use crate::config::TraceConfig;
use crate::node::TraceError;

/// One error in a cause chain.
#[derive(Debug, Clone, Copy)]
pub enum Link<'a> {
    /// A node created by this crate.
    Node(&'a TraceError),
    /// Any other error. Traversal does not look inside it.
    Foreign(&'a (dyn Error + 'static)),
}

impl<'a> Link<'a> {
    /// Classify an error as a node or a foreign error.
    pub fn classify(err: &'a (dyn Error + 'static)) -> Self {
        match err.downcast_ref::<TraceError>() {
            Some(node) => Link::Node(node),
            None => Link::Foreign(err),
        }
    }
}

/// Iterator over the links of a chain, outermost first.
///
/// Stops after the first foreign error or after `max_depth` links.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
    remaining: usize,
    max_depth: usize,
}

impl<'a> Chain<'a> {
    /// A `max_depth` of zero is treated as one: the first link is always
    /// visited.
    pub fn new(err: Option<&'a (dyn Error + 'static)>, max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            next: err,
            remaining: max_depth,
            max_depth,
        }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = Link<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let err = self.next.take()?;
        if self.remaining == 0 {
            warn!(
                max_depth = self.max_depth,
                "error chain exceeds depth limit, truncating traversal"
            );
            return None;
        }
        self.remaining -= 1;

        let link = Link::classify(err);
        if let Link::Node(node) = link {
            self.next = node.source();
        }
        Some(link)
    }
}

/// Assemble the location trace of a chain, oldest cause first.
///
/// Returns an empty string for `None`, a foreign error, or a chain whose
/// nodes carry no location.
pub fn stack_trace(err: Option<&(dyn Error + 'static)>) -> String {
    stack_trace_with(err, &TraceConfig::default())
}

/// [`stack_trace`] with an explicit traversal depth cap.
pub fn stack_trace_with(err: Option<&(dyn Error + 'static)>, config: &TraceConfig) -> String {
    let mut frames: Vec<String> = Chain::new(err, config.max_depth)
        .map_while(|link| match link {
            Link::Node(node) => Some(node.location()),
            Link::Foreign(_) => None,
        })
        .flatten()
        .map(|location| location.to_string())
        .collect();

    // Collected outermost first.
    frames.reverse();
    frames.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;
    use std::io;

    fn located(message: &str, line: u32) -> TraceError {
        TraceError::new(message).at(Some(Location::new(Some("app::step"), "src/app.rs", line)))
    }

    #[test]
    fn test_classify() {
        let node = TraceError::new("node");
        assert!(matches!(Link::classify(&node), Link::Node(_)));

        let foreign = io::Error::other("disk");
        assert!(matches!(Link::classify(&foreign), Link::Foreign(_)));
    }

    #[test]
    fn test_chain_stops_at_foreign_error() {
        let inner = TraceError::wrap(io::Error::other("disk"), "read");
        let outer = TraceError::wrap(inner, "load");

        let links: Vec<_> = Chain::new(Some(&outer), 16).collect();
        assert_eq!(links.len(), 3);
        assert!(matches!(links[0], Link::Node(n) if n.message() == "load"));
        assert!(matches!(links[1], Link::Node(n) if n.message() == "read"));
        assert!(matches!(links[2], Link::Foreign(_)));
    }

    #[test]
    fn test_stack_trace_oldest_first() {
        let err = TraceError::wrap(located("inner", 10), "outer")
            .at(Some(Location::new(Some("app::outer"), "src/app.rs", 20)));

        assert_eq!(
            stack_trace(Some(&err)),
            "app::step\n\tsrc/app.rs:10\napp::outer\n\tsrc/app.rs:20"
        );
    }

    #[test]
    fn test_stack_trace_skips_unlocated_nodes() {
        let inner = located("inner", 10);
        let middle = TraceError::wrap(inner, "middle").at(None);
        let outer = TraceError::wrap(middle, "outer").at(Some(Location::Unknown));

        assert_eq!(stack_trace(Some(&outer)), "app::step\n\tsrc/app.rs:10\nunknown");
    }

    #[test]
    fn test_stack_trace_empty_inputs() {
        assert_eq!(stack_trace(None), "");

        let foreign = io::Error::other("disk");
        assert_eq!(stack_trace(Some(&foreign)), "");

        let unlocated = TraceError::new("bare").at(None);
        assert_eq!(stack_trace(Some(&unlocated)), "");
    }

    #[test]
    fn test_stack_trace_ignores_foreign_causes() {
        #[derive(Debug)]
        struct Outer(TraceError);

        impl std::fmt::Display for Outer {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("outer")
            }
        }

        impl Error for Outer {
            fn source(&self) -> Option<&(dyn Error + 'static)> {
                Some(&self.0)
            }
        }

        let hidden = Outer(located("hidden", 5));
        let err = TraceError::wrap(hidden, "top").at(Some(Location::new(None, "src/top.rs", 1)));

        assert_eq!(stack_trace(Some(&err)), "unknown\n\tsrc/top.rs:1");
    }

    #[test]
    fn test_depth_cap_truncates() {
        let mut err = located("level 0", 1);
        for level in 1..10 {
            err = TraceError::wrap(err, format!("level {level}"))
                .at(Some(Location::new(Some("app::step"), "src/app.rs", level + 1)));
        }

        let capped = TraceConfig::default().with_max_depth(3);
        assert_eq!(Chain::new(Some(&err), 3).count(), 3);
        assert_eq!(
            stack_trace_with(Some(&err), &capped),
            "app::step\n\tsrc/app.rs:8\napp::step\n\tsrc/app.rs:9\napp::step\n\tsrc/app.rs:10"
        );
        assert_eq!(stack_trace(Some(&err)).lines().count(), 20);
    }

    #[test]
    fn test_zero_depth_visits_first_link() {
        let err = TraceError::wrap(located("inner", 1), "outer")
            .at(Some(Location::new(Some("app::outer"), "src/app.rs", 2)));

        assert_eq!(Chain::new(Some(&err), 0).count(), 1);
        let zero = TraceConfig::default().with_max_depth(0);
        assert_eq!(stack_trace_with(Some(&err), &zero), "app::outer\n\tsrc/app.rs:2");
    }
}
