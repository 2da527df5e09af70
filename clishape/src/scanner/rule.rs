//! Line rules: a pattern plus the actions it takes when it fires.

use std::fmt;
use std::sync::Arc;

use log::trace;
use regex::Regex;

use super::captured::{Captured, Output, Site};
use super::context::ScanContext;
use crate::error::ScanError;
use crate::value::{Map, Value};

/// Signature of a custom rule action.
pub type Action =
    dyn Fn(&Captured<'_>, &mut Output<'_>, &mut ScanContext) -> Result<(), ScanError> + Send + Sync;

/// A precondition on the scan context.
///
/// A guard that does not hold is treated exactly like a pattern that does
/// not match: later rules still get the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// The mode is set to this value.
    ModeIs(String, String),

    /// The mode is set to any value.
    ModeSet(String),

    /// The mode is not set.
    ModeUnset(String),
}

impl Guard {
    pub fn mode_is(name: impl Into<String>, value: impl Into<String>) -> Self {
        Guard::ModeIs(name.into(), value.into())
    }

    pub fn mode_set(name: impl Into<String>) -> Self {
        Guard::ModeSet(name.into())
    }

    pub fn mode_unset(name: impl Into<String>) -> Self {
        Guard::ModeUnset(name.into())
    }

    /// Check the guard against a context.
    pub fn holds(&self, context: &ScanContext) -> bool {
        match self {
            Guard::ModeIs(name, value) => context.is(name, value),
            Guard::ModeSet(name) => context.is_set(name),
            Guard::ModeUnset(name) => !context.is_set(name),
        }
    }
}

/// What the scanner does with a line after a rule fired on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Flow {
    /// Move on to the next line.
    #[default]
    Next,

    /// Keep testing later rules against the same line.
    Fallthrough,

    /// Stop the scan; remaining lines are ignored.
    Halt,
}

/// How a capture is converted before it is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Conversion {
    /// Base-10 integer; anything else is a rule defect.
    #[default]
    Int,

    /// Text as captured.
    Str,

    /// Integer when the text is all digits, otherwise the text.
    IntOrStr,

    /// Text folded to lowercase (`Up` and `up` are the same state).
    Lower,
}

/// One level of the path a rule writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A fixed key.
    Key(String),

    /// The current value of a context mode; unset is a rule defect.
    Mode(String),
}

impl Segment {
    pub fn key(key: impl Into<String>) -> Self {
        Segment::Key(key.into())
    }

    pub fn mode(mode: impl Into<String>) -> Self {
        Segment::Mode(mode.into())
    }
}

#[derive(Clone)]
enum Step {
    Ensure(Vec<Segment>),
    Update(Vec<Segment>),
    Enter(String, String),
    Leave(String),
    Custom(Arc<Action>),
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Ensure(path) => f.debug_tuple("Ensure").field(path).finish(),
            Step::Update(path) => f.debug_tuple("Update").field(path).finish(),
            Step::Enter(mode, value) => f.debug_tuple("Enter").field(mode).field(value).finish(),
            Step::Leave(mode) => f.debug_tuple("Leave").field(mode).finish(),
            Step::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A pattern-match-and-action pair applied to each line of output.
///
/// Rules are built once and shared; they hold no per-scan state.
///
/// ```
/// use clishape::scanner::{scan, Guard, Rule, ScanContext};
///
/// let rules = vec![
///     Rule::new("icmp_heading", r"^ICMP +statistics:$")
///         .unwrap()
///         .enter("section", "icmp"),
///     Rule::new("icmp_rcvd", r"^Rcvd: +(?P<icmp_received_format_errors>\d+) +format +errors")
///         .unwrap()
///         .when(Guard::mode_is("section", "icmp"))
///         .update(&["icmp_statistics"]),
/// ];
///
/// let text = "ICMP statistics:\n  Rcvd: 0 format errors, 0 checksum errors\n";
/// let result = scan(&rules, text, ScanContext::new()).unwrap();
/// assert!(result.contains_key("icmp_statistics"));
/// ```
#[derive(Clone)]
pub struct Rule {
    name: String,
    pattern: Regex,
    guards: Vec<Guard>,
    steps: Vec<Step>,
    conversion: Conversion,
    overrides: Vec<(String, Conversion)>,
    flow: Flow,
}

impl Rule {
    /// Create a rule from a name and a regex pattern.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            guards: Vec::new(),
            steps: Vec::new(),
            conversion: Conversion::default(),
            overrides: Vec::new(),
            flow: Flow::default(),
        })
    }

    /// Only attempt this rule while the guard holds.
    pub fn when(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    /// Create the mapping at `path`.
    pub fn ensure(mut self, path: &[&str]) -> Self {
        self.steps.push(Step::Ensure(owned(path)));
        self
    }

    /// Write every participating capture into the mapping at `path`.
    pub fn update(mut self, path: &[&str]) -> Self {
        self.steps.push(Step::Update(owned(path)));
        self
    }

    /// Like [`update`](Self::update), with path levels that may name context
    /// modes, for records spread over several lines.
    ///
    /// ```
    /// use clishape::scanner::{scan, Rule, ScanContext, Segment};
    ///
    /// let rules = vec![
    ///     Rule::new("peer", r"^Peer address: (?P<peer>\S+)$").unwrap().then(|caps, _, ctx| {
    ///         ctx.set("peer", caps.str("peer")?);
    ///         Ok(())
    ///     }),
    ///     Rule::new("state", r"^State: (?P<state>\w+)$")
    ///         .unwrap()
    ///         .convert("state", clishape::scanner::Conversion::Str)
    ///         .update_at(vec![Segment::key("peers"), Segment::mode("peer")]),
    /// ];
    ///
    /// let result = scan(&rules, "Peer address: 10.0.0.1\nState: Up\n", ScanContext::new()).unwrap();
    /// assert!(result["peers"].lookup(&["10.0.0.1", "state"]).is_some());
    /// ```
    pub fn update_at(mut self, path: Vec<Segment>) -> Self {
        self.steps.push(Step::Update(path));
        self
    }

    /// Set the conversion used by [`update`](Self::update) for all captures.
    pub fn conversion(mut self, conversion: Conversion) -> Self {
        self.conversion = conversion;
        self
    }

    /// Override the conversion of one capture.
    pub fn convert(mut self, capture: impl Into<String>, conversion: Conversion) -> Self {
        self.overrides.push((capture.into(), conversion));
        self
    }

    /// Set a context mode.
    pub fn enter(mut self, mode: impl Into<String>, value: impl Into<String>) -> Self {
        self.steps.push(Step::Enter(mode.into(), value.into()));
        self
    }

    /// Clear a context mode.
    pub fn leave(mut self, mode: impl Into<String>) -> Self {
        self.steps.push(Step::Leave(mode.into()));
        self
    }

    /// Run a custom action.
    pub fn then<F>(mut self, action: F) -> Self
    where
        F: Fn(&Captured<'_>, &mut Output<'_>, &mut ScanContext) -> Result<(), ScanError>
            + Send
            + Sync
            + 'static,
    {
        self.steps.push(Step::Custom(Arc::new(action)));
        self
    }

    /// Keep testing later rules after this one fires.
    pub fn fallthrough(mut self) -> Self {
        self.flow = Flow::Fallthrough;
        self
    }

    /// Stop the scan after this rule fires.
    pub fn halt(mut self) -> Self {
        self.flow = Flow::Halt;
        self
    }

    /// Name of the rule, used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Flow after this rule fires.
    pub fn flow(&self) -> Flow {
        self.flow
    }

    fn conversion_for(&self, capture: &str) -> Conversion {
        self.overrides
            .iter()
            .find(|(name, _)| name == capture)
            .map(|(_, conversion)| *conversion)
            .unwrap_or(self.conversion)
    }

    /// Try the rule on one trimmed line.
    ///
    /// Returns `None` if the rule did not fire.
    pub(crate) fn apply(
        &self,
        line: &str,
        context: &mut ScanContext,
        result: &mut Map,
    ) -> Result<Option<Flow>, ScanError> {
        if !self.guards.iter().all(|g| g.holds(context)) {
            return Ok(None);
        }
        let Some(captures) = self.pattern.captures(line) else {
            return Ok(None);
        };

        let line_number = context.line_number();
        trace!("Rule '{}' fired on line {}", self.name, line_number);

        let site = Site {
            rule: &self.name,
            line_number,
            line,
        };
        let caps = Captured::new(captures, &self.pattern, site);

        for step in &self.steps {
            match step {
                Step::Ensure(path) => {
                    let path = resolve(path, &caps, context)?;
                    Output::new(result, site).entry(path.as_slice())?;
                }
                Step::Update(path) => {
                    let mut fields = Vec::new();
                    for (name, _) in caps.iter() {
                        let value = match self.conversion_for(name) {
                            Conversion::Int => Value::Int(caps.int(name)?),
                            Conversion::Str => Value::from(caps.str(name)?),
                            Conversion::IntOrStr => caps.int_or_str(name)?,
                            Conversion::Lower => Value::from(caps.str(name)?.to_lowercase()),
                        };
                        fields.push((name.to_string(), value));
                    }
                    let path = resolve(path, &caps, context)?;
                    Output::new(result, site)
                        .entry(path.as_slice())?
                        .extend(fields);
                }
                Step::Enter(mode, value) => context.set(mode.as_str(), value.as_str()),
                Step::Leave(mode) => context.clear(mode),
                Step::Custom(action) => action(&caps, &mut Output::new(result, site), context)?,
            }
        }

        Ok(Some(self.flow))
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("guards", &self.guards)
            .field("steps", &self.steps)
            .field("flow", &self.flow)
            .finish()
    }
}

fn owned(path: &[&str]) -> Vec<Segment> {
    path.iter().map(|s| Segment::key(*s)).collect()
}

fn resolve<'c>(
    path: &'c [Segment],
    caps: &Captured<'_>,
    context: &'c ScanContext,
) -> Result<Vec<&'c str>, ScanError> {
    path.iter()
        .map(|segment| match segment {
            Segment::Key(key) => Ok(key.as_str()),
            Segment::Mode(mode) => caps.require_mode(context, mode),
        })
        .collect()
}
