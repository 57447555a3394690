//! The node runtime (§4.6): wires collections, rules, and a lineage client
//! together and drives them tick by tick. `FluentBuilder` assembles a
//! `Node`; `Node::tick` advances logical time once; `Node::run` is the only
//! place this crate suspends, awaiting whichever external event (a timer,
//! an inbound socket, a line of stdin) arrives next.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::collections::{
    Channel, Collection, CollectionKind, Mergeable, Periodic, Scratch, Stdin, Stdout, Table,
};
use crate::error::{ConfigError, FluentError};
use crate::lineage::LineageClient;
use crate::pickler::{BincodePickler, Pickler};
use crate::rule::{Rule, RuleOp};
use crate::tuple_id::LogicalTime;
use crate::value::{Tuple, TupleSchema};

/// A cloneable, shared handle to a collection, so a rule's closure can scan
/// the live state the node's event loop also mutates, rather than a
/// snapshot taken at registration time.
pub type TableHandle = Rc<RefCell<Table>>;
pub type ScratchHandle = Rc<RefCell<Scratch>>;
pub type ChannelHandle = Rc<RefCell<Channel>>;
pub type StdinHandle = Rc<RefCell<Stdin>>;
pub type PeriodicHandle = Rc<RefCell<Periodic>>;

struct Registered<H> {
    handle: H,
    schema: TupleSchema,
}

/// Builds a [`Node`] by registering its collections and rules before the
/// event loop starts. Mirrors the teacher's config/builder split: all
/// fallible setup (duplicate names, bad rule wiring) happens here, so
/// `Node::run` itself only deals with runtime events.
pub struct FluentBuilder {
    node_name: String,
    address: String,
    tables: HashMap<String, Registered<TableHandle>>,
    scratches: HashMap<String, Registered<ScratchHandle>>,
    channels: HashMap<String, Registered<ChannelHandle>>,
    stdins: HashMap<String, Registered<StdinHandle>>,
    periodics: HashMap<String, Registered<PeriodicHandle>>,
    rules: Vec<Rule>,
    lineage_client: Box<dyn LineageClient + Send>,
}

impl FluentBuilder {
    pub fn new(
        node_name: impl Into<String>,
        address: impl Into<String>,
        lineage_client: Box<dyn LineageClient + Send>,
    ) -> Self {
        FluentBuilder {
            node_name: node_name.into(),
            address: address.into(),
            tables: HashMap::new(),
            scratches: HashMap::new(),
            channels: HashMap::new(),
            stdins: HashMap::new(),
            periodics: HashMap::new(),
            rules: Vec::new(),
            lineage_client,
        }
    }

    fn assert_name_available(&self, name: &str) {
        let taken = self.tables.contains_key(name)
            || self.scratches.contains_key(name)
            || self.channels.contains_key(name)
            || self.stdins.contains_key(name)
            || self.periodics.contains_key(name);
        assert!(!taken, "collection '{name}' is already registered");
    }

    /// Register a table, returning a handle a rule's closure can clone and
    /// scan with [`crate::ra::Scan::over_collection`].
    pub fn table(&mut self, name: impl Into<String>, schema: TupleSchema) -> TableHandle {
        let name = name.into();
        self.assert_name_available(&name);
        let handle: TableHandle = Rc::new(RefCell::new(Table::new()));
        self.tables.insert(
            name,
            Registered {
                handle: handle.clone(),
                schema,
            },
        );
        handle
    }

    pub fn scratch(&mut self, name: impl Into<String>, schema: TupleSchema) -> ScratchHandle {
        let name = name.into();
        self.assert_name_available(&name);
        let handle: ScratchHandle = Rc::new(RefCell::new(Scratch::new()));
        self.scratches.insert(
            name,
            Registered {
                handle: handle.clone(),
                schema,
            },
        );
        handle
    }

    pub fn channel(&mut self, name: impl Into<String>, schema: TupleSchema) -> ChannelHandle {
        let name = name.into();
        self.assert_name_available(&name);
        let handle: ChannelHandle = Rc::new(RefCell::new(Channel::new()));
        self.channels.insert(
            name,
            Registered {
                handle: handle.clone(),
                schema,
            },
        );
        handle
    }

    pub fn stdin(&mut self, name: impl Into<String>, schema: TupleSchema) -> StdinHandle {
        let name = name.into();
        self.assert_name_available(&name);
        let handle: StdinHandle = Rc::new(RefCell::new(Stdin::new()));
        self.stdins.insert(
            name,
            Registered {
                handle: handle.clone(),
                schema,
            },
        );
        handle
    }

    pub fn periodic(
        &mut self,
        name: impl Into<String>,
        period: Duration,
        schema: TupleSchema,
    ) -> PeriodicHandle {
        let name = name.into();
        self.assert_name_available(&name);
        let handle: PeriodicHandle = Rc::new(RefCell::new(Periodic::new(period)));
        self.periodics.insert(
            name,
            Registered {
                handle: handle.clone(),
                schema,
            },
        );
        handle
    }

    pub fn rule(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Finish setup: push every registered collection and rule to the
    /// lineage client, then hand back a `Node` ready for `tick`/`run`.
    pub fn build(mut self) -> Result<Node, FluentError> {
        self.lineage_client.init()?;

        for (name, reg) in &self.tables {
            self.lineage_client.add_collection(
                name,
                CollectionKind::Table.as_str(),
                &reg.schema.column_names(),
                reg.schema.column_types(),
            )?;
        }
        for (name, reg) in &self.scratches {
            self.lineage_client.add_collection(
                name,
                CollectionKind::Scratch.as_str(),
                &reg.schema.column_names(),
                reg.schema.column_types(),
            )?;
        }
        for (name, reg) in &self.channels {
            self.lineage_client.add_collection(
                name,
                CollectionKind::Channel.as_str(),
                &reg.schema.column_names(),
                reg.schema.column_types(),
            )?;
        }
        for (name, reg) in &self.stdins {
            self.lineage_client.add_collection(
                name,
                CollectionKind::Stdin.as_str(),
                &reg.schema.column_names(),
                reg.schema.column_types(),
            )?;
        }
        for (name, reg) in &self.periodics {
            self.lineage_client.add_collection(
                name,
                CollectionKind::Periodic.as_str(),
                &reg.schema.column_names(),
                reg.schema.column_types(),
            )?;
        }

        for rule in &self.rules {
            let target_exists = self.tables.contains_key(&rule.target_collection)
                || self.scratches.contains_key(&rule.target_collection)
                || self.channels.contains_key(&rule.target_collection);
            if !target_exists {
                return Err(FluentError::Configuration(ConfigError::UnknownRuleTarget {
                    rule_number: rule.rule_number,
                    target: rule.target_collection.clone(),
                }));
            }
            self.lineage_client
                .add_rule(rule.rule_number, rule.bootstrap, &rule.source)?;
        }

        Ok(Node {
            node_name: self.node_name,
            address: self.address,
            logical_time: 0,
            tables: self.tables.into_iter().map(|(k, v)| (k, v.handle)).collect(),
            scratches: self.scratches.into_iter().map(|(k, v)| (k, v.handle)).collect(),
            channels: self.channels.into_iter().map(|(k, v)| (k, v.handle)).collect(),
            stdins: self.stdins.into_iter().map(|(k, v)| (k, v.handle)).collect(),
            stdouts: HashMap::new(),
            periodics: self.periodics.into_iter().map(|(k, v)| (k, v.handle)).collect(),
            rules: self.rules,
            lineage_client: self.lineage_client,
            ran_bootstrap: false,
        })
    }
}

pub struct Node {
    node_name: String,
    address: String,
    logical_time: LogicalTime,
    tables: HashMap<String, TableHandle>,
    scratches: HashMap<String, ScratchHandle>,
    channels: HashMap<String, ChannelHandle>,
    stdins: HashMap<String, StdinHandle>,
    stdouts: HashMap<String, Stdout<Box<dyn Write + Send>>>,
    periodics: HashMap<String, PeriodicHandle>,
    rules: Vec<Rule>,
    lineage_client: Box<dyn LineageClient + Send>,
    ran_bootstrap: bool,
}

impl Node {
    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    pub fn logical_time(&self) -> LogicalTime {
        self.logical_time
    }

    pub fn table(&self, name: &str) -> Option<Ref<'_, Table>> {
        self.tables.get(name).map(|h| h.borrow())
    }

    pub fn register_stdout(&mut self, name: impl Into<String>, sink: Box<dyn Write + Send>) {
        self.stdouts.insert(name.into(), Stdout::new(sink));
    }

    /// Evaluate every rule once and apply its output, then advance every
    /// collection to the next logical time. Bootstrap rules only run on the
    /// node's very first tick. Enqueue failures against the lineage client
    /// are fatal (§7): this returns on the first one rather than silently
    /// dropping lineage for the rest of the tick.
    pub fn tick(&mut self) -> Result<(), FluentError> {
        self.logical_time += 1;
        let now = self.logical_time;

        // Taken out of `self` for the duration of the loop so that
        // `apply_rule_output` can borrow the rest of `self` mutably while a
        // rule reference stays alive.
        let rules = std::mem::take(&mut self.rules);
        let mut result = Ok(());
        for rule in &rules {
            if rule.bootstrap && self.ran_bootstrap {
                continue;
            }
            let rows = rule.evaluate();
            debug!(rule = rule.rule_number, target = %rule.target_collection, rows = rows.len(), "rule fired");
            if let Err(e) = self.apply_rule_output(rule, rows, now) {
                result = Err(e);
                break;
            }
        }
        self.ran_bootstrap = true;
        self.rules = rules;
        result?;

        for t in self.tables.values() {
            t.borrow_mut().tick(now);
        }
        for s in self.scratches.values() {
            s.borrow_mut().tick(now);
        }
        for c in self.channels.values() {
            c.borrow_mut().tick(now);
        }
        for s in self.stdins.values() {
            s.borrow_mut().tick(now);
        }
        for s in self.stdouts.values_mut() {
            Collection::tick(s, now);
        }
        for p in self.periodics.values() {
            p.borrow_mut().tick(now);
        }
        Ok(())
    }

    fn apply_rule_output(
        &mut self,
        rule: &Rule,
        rows: Vec<crate::ra::LineagedRow>,
        now: LogicalTime,
    ) -> Result<(), FluentError> {
        let Some(table_handle) = self.tables.get(&rule.target_collection).cloned() else {
            if let Some(scratch) = self.scratches.get(&rule.target_collection) {
                Mergeable::merge(
                    &mut *scratch.borrow_mut(),
                    rows.into_iter().map(|r| r.tuple).collect(),
                );
            } else if let Some(channel) = self.channels.get(&rule.target_collection) {
                Mergeable::merge(
                    &mut *channel.borrow_mut(),
                    rows.into_iter().map(|r| r.tuple).collect(),
                );
            } else {
                warn!(target = %rule.target_collection, "rule targets an unregistered collection");
            }
            return Ok(());
        };

        let mut table = table_handle.borrow_mut();
        for row in rows {
            let hash = row.tuple.hash();
            match rule.op {
                RuleOp::ImmediateMerge => {
                    table.merge(row.tuple, now);
                    self.lineage_client.insert_tuple(
                        &rule.target_collection,
                        now,
                        hash,
                        chrono::Utc::now(),
                    )?;
                }
                RuleOp::DeferredMerge => table.deferred_merge(row.tuple),
                RuleOp::DeferredDelete => table.deferred_delete(row.tuple),
            }
            for dep in row.provenance {
                self.lineage_client.add_derived_lineage(
                    &dep.collection_name,
                    dep.hash,
                    rule.rule_number,
                    matches!(rule.op, RuleOp::ImmediateMerge | RuleOp::DeferredMerge),
                    &rule.target_collection,
                    hash,
                    now,
                )?;
            }
        }
        Ok(())
    }

    /// The node's only suspension point: wait for whichever event (a
    /// periodic timer, an inbound channel connection, a stdin line) arrives
    /// next, deliver it to the matching collection, and tick.
    pub async fn run(mut self) -> Result<(), FluentError> {
        info!(node = %self.node_name, address = %self.address, "starting node");

        let listener = TcpListener::bind(&self.address).await?;
        let (conn_tx, mut conn_rx) = mpsc::channel::<(String, Tuple)>(1024);
        let (timer_tx, mut timer_rx) = mpsc::channel::<String>(1024);

        for (name, periodic) in &self.periodics {
            let period = periodic.borrow().period();
            let name = name.clone();
            let tx = timer_tx.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                loop {
                    interval.tick().await;
                    if tx.send(name.clone()).await.is_err() {
                        return;
                    }
                }
            });
        }

        let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    if let Ok((stream, peer)) = accepted {
                        debug!(%peer, "accepted channel connection");
                        tokio::spawn(read_frames(stream, conn_tx.clone()));
                    }
                }
                Some((_peer, tuple)) = conn_rx.recv() => {
                    for channel in self.channels.values() {
                        channel.borrow_mut().receive(tuple.clone());
                    }
                    self.tick()?;
                }
                Some(name) = timer_rx.recv() => {
                    if let Some(p) = self.periodics.get(&name) {
                        p.borrow_mut().fire();
                    }
                    self.tick()?;
                }
                line = stdin_lines.next_line() => {
                    match line {
                        Ok(Some(text)) => {
                            for stdin in self.stdins.values() {
                                stdin.borrow_mut().push_line(text.clone());
                            }
                            self.tick()?;
                        }
                        Ok(None) => {}
                        Err(e) => warn!(error = %e, "stdin read failed"),
                    }
                }
            }

            self.flush_outbound_channels().await?;
        }
    }

    async fn flush_outbound_channels(&mut self) -> Result<(), FluentError> {
        for channel in self.channels.values() {
            let outbox = channel.borrow_mut().take_outbox();
            for msg in outbox {
                if let Ok(mut stream) = TcpStream::connect(&msg.address).await {
                    let len = (msg.payload.len() as u32).to_be_bytes();
                    stream.write_all(&len).await?;
                    stream.write_all(&msg.payload).await?;
                }
            }
        }
        Ok(())
    }
}

async fn read_frames(mut stream: TcpStream, tx: mpsc::Sender<(String, Tuple)>) {
    use tokio::io::AsyncReadExt;
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    loop {
        let mut len_buf = [0u8; 4];
        if stream.read_exact(&mut len_buf).await.is_err() {
            return;
        }
        let len = u32::from_be_bytes(len_buf) as usize;
        let mut payload = vec![0u8; len];
        if stream.read_exact(&mut payload).await.is_err() {
            return;
        }
        match BincodePickler::load(&payload) {
            Ok(tuple) => {
                if tx.send((peer.clone(), tuple)).await.is_err() {
                    return;
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to decode inbound channel payload");
            }
        }
    }
}
