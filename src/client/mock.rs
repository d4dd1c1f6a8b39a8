//! client::mock
//!
//! In-memory controller for deterministic testing.
//!
//! # Design
//!
//! `MockController` keeps groups and primitive state in memory and
//! implements [`Connector`], [`Controller`] and, through the sessions it
//! opens, [`Session`]. Failures can be injected per method with
//! [`FailOn`], and every call is recorded as a [`MockOperation`] so tests
//! can assert on session lifecycle.
//!
//! An unresponsive mock opens and closes sessions but never answers
//! anything else; calls end only when their [`TimeoutContext`] expires.
//! Acquiring a lock that is already held blocks the same way.
//!
//! # Example
//!
//! ```
//! use atomix_cli::client::mock::MockController;
//! use atomix_cli::client::ops::SetOp;
//! use atomix_cli::client::Controller;
//! use atomix_cli::core::naming::{GroupReference, PrimitiveName};
//! use atomix_cli::core::timeout::TimeoutContext;
//! use atomix_cli::core::types::PrimitiveKind;
//! use std::time::Duration;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let controller = MockController::new().with_group("default", "raft", 1, 1);
//! let group = GroupReference {
//!     controller: "mock".into(),
//!     namespace: "default".into(),
//!     name: "raft".into(),
//! };
//! let ctx = TimeoutContext::new(Duration::from_secs(1));
//! let session = controller.open_session(&ctx, &group).await.unwrap();
//!
//! let name = PrimitiveName {
//!     namespace: "default".into(),
//!     app: "default".into(),
//!     name: "s1".into(),
//! };
//! session.open_primitive(&ctx, PrimitiveKind::Set, &name).await.unwrap();
//! let added = session
//!     .execute(&ctx, &name, SetOp::Add { value: "foo".into() }.into())
//!     .await
//!     .unwrap();
//! assert!(added.into_bool().unwrap());
//! session.close(&ctx).await.unwrap();
//! # });
//! ```

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::ops::{
    CounterOp, ElectionOp, ListOp, LockOp, MapEntry, MapOp, Operation, Outcome, SetOp, Term,
};
use super::traits::{
    ClientError, Connector, Controller, GroupSpec, PartitionGroup, PrimitiveInfo, Session,
};
use crate::core::naming::{GroupReference, PrimitiveName};
use crate::core::timeout::TimeoutContext;
use crate::core::types::PrimitiveKind;

type GroupKey = (String, String);

/// Mock controller for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockController {
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Debug, Default)]
struct MockInner {
    groups: BTreeMap<GroupKey, PartitionGroup>,
    primitives: HashMap<(GroupKey, PrimitiveName), PrimitiveState>,
    next_session: u64,
    fail_on: Option<FailOn>,
    unresponsive: bool,
    open_delay: Option<Duration>,
    operations: Vec<MockOperation>,
}

/// Which method should fail, and with what.
#[derive(Debug, Clone)]
pub enum FailOn {
    Connect(ClientError),
    ListGroups(ClientError),
    GetGroup(ClientError),
    CreateGroup(ClientError),
    DeleteGroup(ClientError),
    OpenSession(ClientError),
    OpenPrimitive(ClientError),
    Execute(ClientError),
    DeletePrimitive(ClientError),
    ListPrimitives(ClientError),
    CloseSession(ClientError),
}

impl FailOn {
    fn matches(&self, method: &str) -> Option<ClientError> {
        let (name, err) = match self {
            FailOn::Connect(e) => ("connect", e),
            FailOn::ListGroups(e) => ("list_groups", e),
            FailOn::GetGroup(e) => ("get_group", e),
            FailOn::CreateGroup(e) => ("create_group", e),
            FailOn::DeleteGroup(e) => ("delete_group", e),
            FailOn::OpenSession(e) => ("open_session", e),
            FailOn::OpenPrimitive(e) => ("open_primitive", e),
            FailOn::Execute(e) => ("execute", e),
            FailOn::DeletePrimitive(e) => ("delete_primitive", e),
            FailOn::ListPrimitives(e) => ("list_primitives", e),
            FailOn::CloseSession(e) => ("close", e),
        };
        (name == method).then(|| err.clone())
    }
}

/// Recorded call for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Connect {
        endpoint: String,
    },
    ListGroups {
        namespace: String,
    },
    GetGroup {
        group: String,
    },
    CreateGroup {
        group: String,
        spec: GroupSpec,
    },
    DeleteGroup {
        group: String,
    },
    SessionOpened {
        session: String,
        group: String,
    },
    OpenPrimitive {
        kind: PrimitiveKind,
        name: PrimitiveName,
    },
    Execute {
        name: PrimitiveName,
        operation: Operation,
    },
    DeletePrimitive {
        kind: PrimitiveKind,
        name: PrimitiveName,
    },
    ListPrimitives {
        kind: Option<PrimitiveKind>,
    },
    SessionClosed {
        session: String,
    },
}

impl MockController {
    /// Create a mock with no groups.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockInner::default())),
        }
    }

    /// Add a partition group.
    pub fn with_group(self, namespace: &str, name: &str, partitions: u32, size: u32) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.groups.insert(
                (namespace.to_string(), name.to_string()),
                PartitionGroup {
                    name: name.to_string(),
                    namespace: namespace.to_string(),
                    partitions,
                    partition_size: size,
                    protocol: None,
                },
            );
        }
        self
    }

    /// Configure the mock to fail on a specific method.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Make every remote call hang until its deadline.
    ///
    /// Sessions still open and close so their lifecycle can be observed.
    pub fn unresponsive(self) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.unresponsive = true;
        }
        self
    }

    /// Delay every session open by `delay`, ignoring the caller's deadline.
    pub fn slow_open(self, delay: Duration) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.open_delay = Some(delay);
        }
        self
    }

    /// All recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Number of sessions opened so far.
    pub fn sessions_opened(&self) -> usize {
        self.count(|op| matches!(op, MockOperation::SessionOpened { .. }))
    }

    /// Number of session close calls so far.
    pub fn sessions_closed(&self) -> usize {
        self.count(|op| matches!(op, MockOperation::SessionClosed { .. }))
    }

    /// Look up a group (for test verification).
    pub fn group(&self, namespace: &str, name: &str) -> Option<PartitionGroup> {
        let inner = self.inner.lock().unwrap();
        inner
            .groups
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Kind of the named primitive in a group, if it exists.
    pub fn primitive_kind(
        &self,
        group: &GroupReference,
        name: &PrimitiveName,
    ) -> Option<PrimitiveKind> {
        let inner = self.inner.lock().unwrap();
        inner
            .primitives
            .get(&(group_key(group), name.clone()))
            .map(PrimitiveState::kind)
    }

    fn count(&self, pred: impl Fn(&MockOperation) -> bool) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.operations.iter().filter(|op| pred(op)).count()
    }

    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    fn check_fail(&self, method: &str) -> Result<(), ClientError> {
        let inner = self.inner.lock().unwrap();
        match inner.fail_on.as_ref().and_then(|f| f.matches(method)) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Block until the deadline if the mock is unresponsive.
    async fn stall(&self, ctx: &TimeoutContext) -> Result<(), ClientError> {
        let unresponsive = self.inner.lock().unwrap().unresponsive;
        if unresponsive {
            ctx.run(std::future::pending::<Result<(), ClientError>>())
                .await?;
        }
        Ok(())
    }

    /// Record, honor failure injection, then stall if unresponsive.
    async fn enter(
        &self,
        ctx: &TimeoutContext,
        method: &str,
        op: MockOperation,
    ) -> Result<(), ClientError> {
        self.record(op);
        self.check_fail(method)?;
        self.stall(ctx).await
    }
}

impl Default for MockController {
    fn default() -> Self {
        Self::new()
    }
}

fn group_key(group: &GroupReference) -> GroupKey {
    (group.namespace.clone(), group.name.clone())
}

impl Connector for MockController {
    fn connect(&self, endpoint: &str) -> Result<Arc<dyn Controller>, ClientError> {
        self.record(MockOperation::Connect {
            endpoint: endpoint.to_string(),
        });
        self.check_fail("connect")?;
        Ok(Arc::new(self.clone()))
    }
}

#[async_trait]
impl Controller for MockController {
    fn endpoint(&self) -> &str {
        "mock"
    }

    async fn list_groups(
        &self,
        ctx: &TimeoutContext,
        namespace: &str,
    ) -> Result<Vec<PartitionGroup>, ClientError> {
        let op = MockOperation::ListGroups {
            namespace: namespace.to_string(),
        };
        self.enter(ctx, "list_groups", op).await?;

        let inner = self.inner.lock().unwrap();
        Ok(inner
            .groups
            .values()
            .filter(|g| g.namespace == namespace)
            .cloned()
            .collect())
    }

    async fn get_group(
        &self,
        ctx: &TimeoutContext,
        group: &GroupReference,
    ) -> Result<PartitionGroup, ClientError> {
        let op = MockOperation::GetGroup {
            group: group.to_string(),
        };
        self.enter(ctx, "get_group", op).await?;

        let inner = self.inner.lock().unwrap();
        inner
            .groups
            .get(&group_key(group))
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("partition group {}", group)))
    }

    async fn create_group(
        &self,
        ctx: &TimeoutContext,
        group: &GroupReference,
        spec: GroupSpec,
    ) -> Result<PartitionGroup, ClientError> {
        let op = MockOperation::CreateGroup {
            group: group.to_string(),
            spec: spec.clone(),
        };
        self.enter(ctx, "create_group", op).await?;

        if spec.partitions == 0 || spec.partition_size == 0 {
            return Err(ClientError::Remote(
                "partitions and partition size must be at least 1".into(),
            ));
        }

        let mut inner = self.inner.lock().unwrap();
        let key = group_key(group);
        if inner.groups.contains_key(&key) {
            return Err(ClientError::Remote(format!(
                "partition group {} already exists",
                group
            )));
        }

        let created = PartitionGroup {
            name: group.name.clone(),
            namespace: group.namespace.clone(),
            partitions: spec.partitions,
            partition_size: spec.partition_size,
            protocol: Some(spec.protocol),
        };
        inner.groups.insert(key, created.clone());
        Ok(created)
    }

    async fn delete_group(
        &self,
        ctx: &TimeoutContext,
        group: &GroupReference,
    ) -> Result<(), ClientError> {
        let op = MockOperation::DeleteGroup {
            group: group.to_string(),
        };
        self.enter(ctx, "delete_group", op).await?;

        let mut inner = self.inner.lock().unwrap();
        let key = group_key(group);
        if inner.groups.remove(&key).is_none() {
            return Err(ClientError::NotFound(format!("partition group {}", group)));
        }
        inner.primitives.retain(|(g, _), _| *g != key);
        Ok(())
    }

    async fn open_session(
        &self,
        _ctx: &TimeoutContext,
        group: &GroupReference,
    ) -> Result<Arc<dyn Session>, ClientError> {
        self.check_fail("open_session")?;
        let delay = self.inner.lock().unwrap().open_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let id = {
            let mut inner = self.inner.lock().unwrap();
            if !inner.groups.contains_key(&group_key(group)) {
                return Err(ClientError::NotFound(format!("partition group {}", group)));
            }
            inner.next_session += 1;
            format!("session-{}", inner.next_session)
        };

        self.record(MockOperation::SessionOpened {
            session: id.clone(),
            group: group.to_string(),
        });

        Ok(Arc::new(MockSession {
            id,
            group: group.clone(),
            controller: self.clone(),
            closed: AtomicBool::new(false),
        }))
    }
}

/// A session opened by [`MockController`].
#[derive(Debug)]
pub struct MockSession {
    id: String,
    group: GroupReference,
    controller: MockController,
    closed: AtomicBool,
}

impl MockSession {
    fn ensure_open(&self) -> Result<(), ClientError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ClientError::Remote(format!("session {} is closed", self.id)));
        }
        Ok(())
    }

    fn key(&self, name: &PrimitiveName) -> (GroupKey, PrimitiveName) {
        (group_key(&self.group), name.clone())
    }
}

#[async_trait]
impl Session for MockSession {
    fn id(&self) -> &str {
        &self.id
    }

    fn group(&self) -> &GroupReference {
        &self.group
    }

    async fn open_primitive(
        &self,
        ctx: &TimeoutContext,
        kind: PrimitiveKind,
        name: &PrimitiveName,
    ) -> Result<(), ClientError> {
        let op = MockOperation::OpenPrimitive {
            kind,
            name: name.clone(),
        };
        self.controller.enter(ctx, "open_primitive", op).await?;
        self.ensure_open()?;

        let mut inner = self.controller.inner.lock().unwrap();
        let state = inner
            .primitives
            .entry(self.key(name))
            .or_insert_with(|| PrimitiveState::new(kind));
        if state.kind() != kind {
            return Err(ClientError::Remote(format!(
                "{} already exists as a {}",
                name,
                state.kind()
            )));
        }
        Ok(())
    }

    async fn execute(
        &self,
        ctx: &TimeoutContext,
        name: &PrimitiveName,
        operation: Operation,
    ) -> Result<Outcome, ClientError> {
        let op = MockOperation::Execute {
            name: name.clone(),
            operation: operation.clone(),
        };
        self.controller.enter(ctx, "execute", op).await?;
        self.ensure_open()?;

        let applied = {
            let mut inner = self.controller.inner.lock().unwrap();
            let state = inner
                .primitives
                .get_mut(&self.key(name))
                .ok_or_else(|| ClientError::NotFound(format!("primitive {}", name)))?;
            state.apply(&self.id, operation)?
        };

        match applied {
            Applied::Done(outcome) => Ok(outcome),
            Applied::Blocked => ctx.run(std::future::pending()).await,
        }
    }

    async fn delete_primitive(
        &self,
        ctx: &TimeoutContext,
        kind: PrimitiveKind,
        name: &PrimitiveName,
    ) -> Result<(), ClientError> {
        let op = MockOperation::DeletePrimitive {
            kind,
            name: name.clone(),
        };
        self.controller.enter(ctx, "delete_primitive", op).await?;
        self.ensure_open()?;

        let mut inner = self.controller.inner.lock().unwrap();
        let key = self.key(name);
        match inner.primitives.get(&key).map(PrimitiveState::kind) {
            None => Err(ClientError::NotFound(format!("primitive {}", name))),
            Some(existing) if existing != kind => Err(ClientError::Remote(format!(
                "{} is a {}, not a {}",
                name, existing, kind
            ))),
            Some(_) => {
                inner.primitives.remove(&key);
                Ok(())
            }
        }
    }

    async fn list_primitives(
        &self,
        ctx: &TimeoutContext,
        kind: Option<PrimitiveKind>,
    ) -> Result<Vec<PrimitiveInfo>, ClientError> {
        let op = MockOperation::ListPrimitives { kind };
        self.controller.enter(ctx, "list_primitives", op).await?;
        self.ensure_open()?;

        let inner = self.controller.inner.lock().unwrap();
        let group = group_key(&self.group);
        let mut found: Vec<PrimitiveInfo> = inner
            .primitives
            .iter()
            .filter(|((g, _), state)| *g == group && kind.map_or(true, |k| k == state.kind()))
            .map(|((_, name), state)| PrimitiveInfo {
                kind: state.kind(),
                name: name.clone(),
            })
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn close(&self, _ctx: &TimeoutContext) -> Result<(), ClientError> {
        self.controller.record(MockOperation::SessionClosed {
            session: self.id.clone(),
        });
        self.controller.check_fail("close")?;

        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let mut inner = self.controller.inner.lock().unwrap();
        for state in inner.primitives.values_mut() {
            state.release(&self.id);
        }
        Ok(())
    }
}

enum Applied {
    Done(Outcome),
    Blocked,
}

#[derive(Debug)]
enum PrimitiveState {
    Counter(i64),
    Election(Term),
    List(Vec<String>),
    Lock {
        holder: Option<(String, u64)>,
        next_version: u64,
    },
    Map {
        entries: BTreeMap<String, (String, u64)>,
        next_version: u64,
    },
    Set(BTreeSet<String>),
}

impl PrimitiveState {
    fn new(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Counter => PrimitiveState::Counter(0),
            PrimitiveKind::Election => PrimitiveState::Election(Term::default()),
            PrimitiveKind::List => PrimitiveState::List(Vec::new()),
            PrimitiveKind::Lock => PrimitiveState::Lock {
                holder: None,
                next_version: 1,
            },
            PrimitiveKind::Map => PrimitiveState::Map {
                entries: BTreeMap::new(),
                next_version: 1,
            },
            PrimitiveKind::Set => PrimitiveState::Set(BTreeSet::new()),
        }
    }

    fn kind(&self) -> PrimitiveKind {
        match self {
            PrimitiveState::Counter(_) => PrimitiveKind::Counter,
            PrimitiveState::Election(_) => PrimitiveKind::Election,
            PrimitiveState::List(_) => PrimitiveKind::List,
            PrimitiveState::Lock { .. } => PrimitiveKind::Lock,
            PrimitiveState::Map { .. } => PrimitiveKind::Map,
            PrimitiveState::Set(_) => PrimitiveKind::Set,
        }
    }

    /// Drop anything the closing session holds.
    fn release(&mut self, session: &str) {
        match self {
            PrimitiveState::Lock { holder, .. } => {
                if holder.as_ref().is_some_and(|(s, _)| s == session) {
                    *holder = None;
                }
            }
            PrimitiveState::Election(term) => evict(term, session),
            _ => {}
        }
    }

    fn apply(&mut self, session: &str, operation: Operation) -> Result<Applied, ClientError> {
        let kind = self.kind();
        let outcome = match (self, operation) {
            (PrimitiveState::Counter(value), Operation::Counter(op)) => apply_counter(value, op)?,
            (PrimitiveState::Election(term), Operation::Election(op)) => {
                apply_election(term, session, op)?
            }
            (PrimitiveState::List(items), Operation::List(op)) => apply_list(items, op)?,
            (
                PrimitiveState::Lock {
                    holder,
                    next_version,
                },
                Operation::Lock(op),
            ) => match op {
                LockOp::Lock => {
                    if holder.is_some() {
                        return Ok(Applied::Blocked);
                    }
                    let version = *next_version;
                    *next_version += 1;
                    *holder = Some((session.to_string(), version));
                    Outcome::Version(version)
                }
                LockOp::Unlock { if_version } => match holder.as_ref() {
                    Some((owner, version))
                        if owner == session && if_version.map_or(true, |v| v == *version) =>
                    {
                        *holder = None;
                        Outcome::Bool(true)
                    }
                    _ => Outcome::Bool(false),
                },
                LockOp::IsLocked { if_version } => Outcome::Bool(match holder.as_ref() {
                    Some((_, version)) => if_version.map_or(true, |v| v == *version),
                    None => false,
                }),
            },
            (
                PrimitiveState::Map {
                    entries,
                    next_version,
                },
                Operation::Map(op),
            ) => apply_map(entries, next_version, op)?,
            (PrimitiveState::Set(values), Operation::Set(op)) => match op {
                SetOp::Add { value } => Outcome::Bool(values.insert(value)),
                SetOp::Contains { value } => Outcome::Bool(values.contains(&value)),
                SetOp::Remove { value } => Outcome::Bool(values.remove(&value)),
                SetOp::Size => Outcome::Size(values.len() as u64),
                SetOp::Clear => {
                    values.clear();
                    Outcome::Unit
                }
            },
            (_, operation) => {
                return Err(ClientError::Remote(format!(
                    "primitive is a {}, not a {}",
                    kind,
                    operation.kind()
                )))
            }
        };
        Ok(Applied::Done(outcome))
    }
}

fn apply_counter(value: &mut i64, op: CounterOp) -> Result<Outcome, ClientError> {
    let overflow = || ClientError::Remote("counter overflow".into());
    match op {
        CounterOp::Get => {}
        CounterOp::Set { value: v } => *value = v,
        CounterOp::Increment { delta } => *value = value.checked_add(delta).ok_or_else(overflow)?,
        CounterOp::Decrement { delta } => *value = value.checked_sub(delta).ok_or_else(overflow)?,
    }
    Ok(Outcome::Counter(*value))
}

fn apply_list(items: &mut Vec<String>, op: ListOp) -> Result<Outcome, ClientError> {
    let out_of_bounds = |index: usize, len: usize| {
        ClientError::Remote(format!(
            "index {} out of bounds for list of size {}",
            index, len
        ))
    };
    Ok(match op {
        ListOp::Append { value } => {
            items.push(value);
            Outcome::Unit
        }
        ListOp::Insert { index, value } => {
            if index > items.len() {
                return Err(out_of_bounds(index, items.len()));
            }
            items.insert(index, value);
            Outcome::Unit
        }
        ListOp::Get { index } => match items.get(index) {
            Some(value) => Outcome::Value(Some(value.clone())),
            None => return Err(out_of_bounds(index, items.len())),
        },
        ListOp::Remove { index } => {
            if index >= items.len() {
                return Err(out_of_bounds(index, items.len()));
            }
            Outcome::Value(Some(items.remove(index)))
        }
        ListOp::Items => Outcome::Values(items.clone()),
        ListOp::Size => Outcome::Size(items.len() as u64),
        ListOp::Clear => {
            items.clear();
            Outcome::Unit
        }
    })
}

fn apply_map(
    entries: &mut BTreeMap<String, (String, u64)>,
    next_version: &mut u64,
    op: MapOp,
) -> Result<Outcome, ClientError> {
    let check = |entries: &BTreeMap<String, (String, u64)>, key: &str, expected: Option<u64>| {
        let Some(expected) = expected else {
            return Ok(());
        };
        match entries.get(key) {
            Some((_, version)) if *version == expected => Ok(()),
            Some((_, version)) => Err(ClientError::PreconditionFailed(format!(
                "key '{}' is at version {}, not {}",
                key, version, expected
            ))),
            None => Err(ClientError::PreconditionFailed(format!(
                "key '{}' does not exist",
                key
            ))),
        }
    };

    Ok(match op {
        MapOp::Put {
            key,
            value,
            if_version,
        } => {
            check(entries, &key, if_version)?;
            let version = *next_version;
            *next_version += 1;
            entries.insert(key.clone(), (value.clone(), version));
            Outcome::Entry(Some(MapEntry {
                key,
                value,
                version,
            }))
        }
        MapOp::Get { key } => Outcome::Entry(entries.get(&key).map(|(value, version)| MapEntry {
            key: key.clone(),
            value: value.clone(),
            version: *version,
        })),
        MapOp::Remove { key, if_version } => {
            check(entries, &key, if_version)?;
            Outcome::Entry(entries.remove(&key).map(|(value, version)| MapEntry {
                key,
                value,
                version,
            }))
        }
        MapOp::Keys => Outcome::Values(entries.keys().cloned().collect()),
        MapOp::Size => Outcome::Size(entries.len() as u64),
        MapOp::Clear => {
            entries.clear();
            Outcome::Unit
        }
    })
}

fn apply_election(term: &mut Term, session: &str, op: ElectionOp) -> Result<Outcome, ClientError> {
    match op {
        ElectionOp::Enter => {
            if !term.candidates.iter().any(|c| c == session) {
                term.candidates.push(session.to_string());
            }
            if term.leader.is_none() {
                term.leader = Some(session.to_string());
                term.term += 1;
            }
        }
        ElectionOp::Leave => evict(term, session),
        ElectionOp::GetTerm => {}
        ElectionOp::Promote { candidate } => {
            let position = term
                .candidates
                .iter()
                .position(|c| *c == candidate)
                .ok_or_else(|| ClientError::Remote(format!("unknown candidate {}", candidate)))?;
            let promoted = term.candidates.remove(position);
            term.candidates.insert(0, promoted);
            if term.leader.as_deref() != Some(candidate.as_str()) {
                term.leader = Some(candidate);
                term.term += 1;
            }
        }
        ElectionOp::Evict { candidate } => {
            if !term.candidates.iter().any(|c| *c == candidate) {
                return Err(ClientError::Remote(format!(
                    "unknown candidate {}",
                    candidate
                )));
            }
            evict(term, &candidate);
        }
    }
    Ok(Outcome::Term(term.clone()))
}

fn evict(term: &mut Term, candidate: &str) {
    term.candidates.retain(|c| c != candidate);
    if term.leader.as_deref() == Some(candidate) {
        term.leader = term.candidates.first().cloned();
        if term.leader.is_some() {
            term.term += 1;
        }
    }
}
