//! In-process stand-in for a Redis server.
//!
//! `MemoryStore` implements [`ConnectionLike`] by decoding the RESP bytes the
//! client would put on the wire and executing them against in-memory data.
//! It covers the commands the client issues, counts calls per command, can
//! flush its script cache, can be taken offline, and keeps a virtual clock for
//! expiry tests. The two bulk-operation procedures are executed natively by
//! recognising their source.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use redis::aio::ConnectionLike;
use redis::{Cmd, ErrorKind, Pipeline, RedisError, RedisFuture, RedisResult, Value};

use cachext_core::cache::{pattern_matches, BulkCommand, JsonCodec, KeyBuilder};

use crate::client::{ConnectionPool, ExtendedClient};

/// A client on `store` with prefix `test` and version 1.
pub fn client(store: &MemoryStore) -> ExtendedClient<MemoryStore> {
    ExtendedClient::new(
        ConnectionPool::new(store.clone()),
        KeyBuilder::new("test", 1),
        JsonCodec,
    )
}

#[derive(Debug, Clone)]
enum Entry {
    Str(Vec<u8>),
    List(VecDeque<Vec<u8>>),
    /// Kept sorted by (score, member).
    ZSet(Vec<(Vec<u8>, f64)>),
}

#[derive(Debug, Clone)]
struct Slot {
    entry: Entry,
    expires_at_ms: Option<i64>,
}

#[derive(Debug, Default)]
struct State {
    data: BTreeMap<Vec<u8>, Slot>,
    scripts: HashMap<String, String>,
    calls: Vec<String>,
    scan_pages: usize,
    clock_offset_ms: i64,
    offline: bool,
}

/// Shared in-memory store; clones are connections to the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Makes every command fail as if the server refused the connection.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Moves the store's clock forward.
    pub fn advance(&self, by: Duration) {
        self.lock().clock_offset_ms += by.as_millis() as i64;
    }

    /// Forgets every loaded script, like `SCRIPT FLUSH`.
    pub fn flush_scripts(&self) {
        self.lock().scripts.clear();
    }

    /// Number of times a command was received, e.g. `"SCRIPT LOAD"` or `"ZADD"`.
    pub fn calls(&self, command: &str) -> usize {
        self.lock().calls.iter().filter(|c| *c == command).count()
    }

    pub fn total_calls(&self) -> usize {
        self.lock().calls.len()
    }

    /// SCAN pages walked by bulk-operation procedures.
    pub fn scan_pages(&self) -> usize {
        self.lock().scan_pages
    }

    /// Every live key, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut state = self.lock();
        state.purge_expired();
        state
            .data
            .keys()
            .map(|k| String::from_utf8_lossy(k).into_owned())
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        let mut state = self.lock();
        state.purge_expired();
        state.data.contains_key(key.as_bytes())
    }

    /// Stores a raw string value, bypassing the client.
    pub fn insert_raw(&self, key: &str, value: &[u8]) {
        self.lock().data.insert(
            key.as_bytes().to_vec(),
            Slot {
                entry: Entry::Str(value.to_vec()),
                expires_at_ms: None,
            },
        );
    }

    fn dispatch(&self, packed: &[u8]) -> RedisResult<Vec<Value>> {
        let commands = parse_packed(packed)?;
        let mut state = self.lock();
        if state.offline {
            return Err(RedisError::from(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }

        let mut replies = Vec::with_capacity(commands.len());
        let mut queued: Option<Vec<Value>> = None;
        for args in commands {
            let name = upper(&args[0]);
            match name.as_str() {
                "MULTI" => {
                    queued = Some(Vec::new());
                    replies.push(Value::Okay);
                }
                "EXEC" => {
                    let results = queued.take().unwrap_or_default();
                    replies.push(Value::Array(results));
                }
                _ => {
                    let reply = state.exec(&args)?;
                    match queued.as_mut() {
                        Some(results) => {
                            results.push(reply);
                            replies.push(Value::SimpleString("QUEUED".to_string()));
                        }
                        None => replies.push(reply),
                    }
                }
            }
        }
        Ok(replies)
    }
}

impl ConnectionLike for MemoryStore {
    fn req_packed_command<'a>(&'a mut self, cmd: &'a Cmd) -> RedisFuture<'a, Value> {
        let result = self.dispatch(&cmd.get_packed_command()).and_then(|mut replies| {
            replies
                .pop()
                .ok_or_else(|| error(ErrorKind::ClientError, "empty command"))
        });
        Box::pin(async move { result })
    }

    fn req_packed_commands<'a>(
        &'a mut self,
        cmd: &'a Pipeline,
        offset: usize,
        count: usize,
    ) -> RedisFuture<'a, Vec<Value>> {
        let result = self
            .dispatch(&cmd.get_packed_pipeline())
            .map(|replies| replies.into_iter().skip(offset).take(count).collect());
        Box::pin(async move { result })
    }

    fn get_db(&self) -> i64 {
        0
    }
}

impl State {
    fn now_ms(&self) -> i64 {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        wall + self.clock_offset_ms
    }

    fn purge_expired(&mut self) {
        let now = self.now_ms();
        self.data
            .retain(|_, slot| slot.expires_at_ms.is_none_or(|at| at > now));
    }

    fn exec(&mut self, args: &[Vec<u8>]) -> RedisResult<Value> {
        self.purge_expired();
        let name = upper(&args[0]);
        let name = if name == "SCRIPT" && args.len() > 1 {
            format!("SCRIPT {}", upper(&args[1]))
        } else {
            name
        };
        self.calls.push(name.clone());
        let rest = &args[1..];

        match name.as_str() {
            "GET" => {
                let key = arg(rest, 0)?;
                match self.data.get(key).map(|s| &s.entry) {
                    None => Ok(Value::Nil),
                    Some(Entry::Str(v)) => Ok(Value::BulkString(v.clone())),
                    Some(_) => Err(wrong_type()),
                }
            }
            "SET" => self.set(rest),
            "DEL" | "UNLINK" => {
                let removed = rest
                    .iter()
                    .filter(|key| self.data.remove(*key).is_some())
                    .count();
                Ok(Value::Int(removed as i64))
            }
            "EXISTS" => Ok(Value::Int(
                rest.iter().filter(|k| self.data.contains_key(*k)).count() as i64,
            )),
            "RENAME" => {
                let slot = self
                    .data
                    .remove(arg(rest, 0)?)
                    .ok_or_else(|| error(ErrorKind::ResponseError, "ERR no such key"))?;
                self.data.insert(arg(rest, 1)?.to_vec(), slot);
                Ok(Value::Okay)
            }
            "EXPIREAT" | "PEXPIREAT" => {
                let at = int(arg(rest, 1)?)?;
                let at_ms = if name == "EXPIREAT" { at * 1000 } else { at };
                match self.data.get_mut(arg(rest, 0)?) {
                    Some(slot) => {
                        slot.expires_at_ms = Some(at_ms);
                        self.purge_expired();
                        Ok(Value::Int(1))
                    }
                    None => Ok(Value::Int(0)),
                }
            }
            "FLUSHDB" => {
                self.data.clear();
                Ok(Value::Okay)
            }
            "LPUSH" | "RPUSH" => {
                let list = self.list_mut(arg(rest, 0)?, true)?.expect("created");
                for value in &rest[1..] {
                    if name == "LPUSH" {
                        list.push_front(value.clone());
                    } else {
                        list.push_back(value.clone());
                    }
                }
                Ok(Value::Int(list.len() as i64))
            }
            "LPOP" | "RPOP" => self.pop(&name, rest),
            "LRANGE" => {
                let Some(list) = self.list_mut(arg(rest, 0)?, false)? else {
                    return Ok(Value::Array(Vec::new()));
                };
                let items: Vec<Vec<u8>> = list.iter().cloned().collect();
                let (start, end) = range(items.len(), int(arg(rest, 1)?)?, int(arg(rest, 2)?)?);
                Ok(bulk_array(items.get(start..end).unwrap_or_default()))
            }
            "LINDEX" => {
                let Some(list) = self.list_mut(arg(rest, 0)?, false)? else {
                    return Ok(Value::Nil);
                };
                let idx = int(arg(rest, 1)?)?;
                let idx = if idx < 0 { list.len() as i64 + idx } else { idx };
                Ok(usize::try_from(idx)
                    .ok()
                    .and_then(|i| list.get(i))
                    .map_or(Value::Nil, |v| Value::BulkString(v.clone())))
            }
            "LINSERT" => {
                let before = upper(arg(rest, 1)?) == "BEFORE";
                let pivot = arg(rest, 2)?.to_vec();
                let value = arg(rest, 3)?.to_vec();
                let Some(list) = self.list_mut(arg(rest, 0)?, false)? else {
                    return Ok(Value::Int(0));
                };
                match list.iter().position(|v| *v == pivot) {
                    None => Ok(Value::Int(-1)),
                    Some(pos) => {
                        list.insert(if before { pos } else { pos + 1 }, value);
                        Ok(Value::Int(list.len() as i64))
                    }
                }
            }
            "ZADD" => self.zadd(rest),
            "ZCOUNT" => {
                let (min, max) = (bound(arg(rest, 1)?, true)?, bound(arg(rest, 2)?, false)?);
                let set = self.zset(arg(rest, 0)?)?;
                Ok(Value::Int(
                    set.iter().filter(|(_, s)| min.admits(*s) && max.admits(*s)).count() as i64,
                ))
            }
            "ZRANGE" => {
                let flags: Vec<String> = rest[3..].iter().map(|a| upper(a)).collect();
                let mut set = self.zset(arg(rest, 0)?)?;
                if flags.iter().any(|f| f == "REV") {
                    set.reverse();
                }
                let (start, end) = range(set.len(), int(arg(rest, 1)?)?, int(arg(rest, 2)?)?);
                let page = set.get(start..end).unwrap_or_default();
                Ok(members(page, flags.iter().any(|f| f == "WITHSCORES")))
            }
            "ZRANGEBYSCORE" => {
                let (min, max) = (bound(arg(rest, 1)?, true)?, bound(arg(rest, 2)?, false)?);
                let set = self.zset(arg(rest, 0)?)?;
                let mut matched: Vec<(Vec<u8>, f64)> = set
                    .into_iter()
                    .filter(|(_, s)| min.admits(*s) && max.admits(*s))
                    .collect();
                let mut with_scores = false;
                let mut i = 3;
                while i < rest.len() {
                    match upper(&rest[i]).as_str() {
                        "WITHSCORES" => with_scores = true,
                        "LIMIT" => {
                            let offset = int(arg(rest, i + 1)?)?.max(0) as usize;
                            let count = int(arg(rest, i + 2)?)?;
                            matched = matched.into_iter().skip(offset).collect();
                            if count >= 0 {
                                matched.truncate(count as usize);
                            }
                            i += 2;
                        }
                        _ => return Err(error(ErrorKind::ResponseError, "ERR syntax error")),
                    }
                    i += 1;
                }
                Ok(members(&matched, with_scores))
            }
            "ZREMRANGEBYSCORE" => {
                let (min, max) = (bound(arg(rest, 1)?, true)?, bound(arg(rest, 2)?, false)?);
                self.zset_retain(arg(rest, 0)?, |_, s| !(min.admits(s) && max.admits(s)))
            }
            "ZREM" => {
                let doomed: Vec<Vec<u8>> = rest[1..].to_vec();
                self.zset_retain(arg(rest, 0)?, |m, _| !doomed.iter().any(|d| d == m))
            }
            "SCRIPT LOAD" => {
                let source = String::from_utf8_lossy(arg(rest, 1)?).into_owned();
                let sha = digest(&source);
                self.scripts.insert(sha.clone(), source);
                Ok(Value::BulkString(sha.into_bytes()))
            }
            "SCRIPT EXISTS" => Ok(Value::Array(
                rest[1..]
                    .iter()
                    .map(|sha| {
                        let known = self.scripts.contains_key(&*String::from_utf8_lossy(sha));
                        Value::Int(known as i64)
                    })
                    .collect(),
            )),
            "SCRIPT FLUSH" => {
                self.scripts.clear();
                Ok(Value::Okay)
            }
            "EVALSHA" => {
                let sha = String::from_utf8_lossy(arg(rest, 0)?).into_owned();
                let source = self.scripts.get(&sha).cloned().ok_or_else(|| {
                    RedisError::from((
                        ErrorKind::NoScriptError,
                        "NOSCRIPT",
                        "No matching script. Please use EVAL.".to_string(),
                    ))
                })?;
                self.run_script(&source, rest)
            }
            "EVAL" => {
                let source = String::from_utf8_lossy(arg(rest, 0)?).into_owned();
                self.scripts.insert(digest(&source), source.clone());
                self.run_script(&source, rest)
            }
            _ => Err(error(ErrorKind::ResponseError, "ERR unknown command")),
        }
    }

    fn set(&mut self, rest: &[Vec<u8>]) -> RedisResult<Value> {
        let key = arg(rest, 0)?.to_vec();
        let value = arg(rest, 1)?.to_vec();
        let now = self.now_ms();
        let mut expires_at_ms = None;
        let mut i = 2;
        while i < rest.len() {
            let option = upper(&rest[i]);
            let amount = int(arg(rest, i + 1)?)?;
            if matches!(option.as_str(), "EX" | "PX") && amount <= 0 {
                return Err(error(
                    ErrorKind::ResponseError,
                    "ERR invalid expire time in 'set' command",
                ));
            }
            expires_at_ms = Some(match option.as_str() {
                "EX" => now + amount * 1000,
                "PX" => now + amount,
                "EXAT" => amount * 1000,
                "PXAT" => amount,
                _ => return Err(error(ErrorKind::ResponseError, "ERR syntax error")),
            });
            i += 2;
        }
        self.data.insert(
            key,
            Slot {
                entry: Entry::Str(value),
                expires_at_ms,
            },
        );
        self.purge_expired();
        Ok(Value::Okay)
    }

    fn pop(&mut self, name: &str, rest: &[Vec<u8>]) -> RedisResult<Value> {
        let key = arg(rest, 0)?.to_vec();
        let count = rest.get(1).map(|c| int(c)).transpose()?;
        let Some(list) = self.list_mut(&key, false)? else {
            return Ok(Value::Nil);
        };

        let take = count.unwrap_or(1).max(0) as usize;
        let mut popped = Vec::with_capacity(take);
        for _ in 0..take {
            let item = if name == "LPOP" {
                list.pop_front()
            } else {
                list.pop_back()
            };
            match item {
                Some(item) => popped.push(item),
                None => break,
            }
        }
        if list.is_empty() {
            self.data.remove(&key);
        }

        Ok(match count {
            Some(_) => bulk_array(&popped),
            None => popped
                .pop()
                .map_or(Value::Nil, Value::BulkString),
        })
    }

    fn zadd(&mut self, rest: &[Vec<u8>]) -> RedisResult<Value> {
        let key = arg(rest, 0)?.to_vec();
        let mut i = 1;
        let (mut nx, mut xx) = (false, false);
        loop {
            match rest.get(i).map(|a| upper(a)).as_deref() {
                Some("NX") => nx = true,
                Some("XX") => xx = true,
                _ => break,
            }
            i += 1;
        }
        if nx && xx {
            return Err(error(
                ErrorKind::ResponseError,
                "ERR XX and NX options at the same time are not compatible",
            ));
        }
        if (rest.len() - i) % 2 != 0 || rest.len() == i {
            return Err(error(ErrorKind::ResponseError, "ERR syntax error"));
        }

        let mut set = self.zset(&key)?;
        let mut added = 0;
        for pair in rest[i..].chunks(2) {
            let score = float(&pair[0])?;
            let member = pair[1].clone();
            match set.iter_mut().find(|(m, _)| *m == member) {
                Some(existing) if !nx => existing.1 = score,
                Some(_) => {}
                None if !xx => {
                    set.push((member, score));
                    added += 1;
                }
                None => {}
            }
        }
        sort_zset(&mut set);
        if !set.is_empty() {
            self.data.insert(
                key,
                Slot {
                    entry: Entry::ZSet(set),
                    expires_at_ms: None,
                },
            );
        }
        Ok(Value::Int(added))
    }

    fn list_mut(
        &mut self,
        key: &[u8],
        create: bool,
    ) -> RedisResult<Option<&mut VecDeque<Vec<u8>>>> {
        if create && !self.data.contains_key(key) {
            self.data.insert(
                key.to_vec(),
                Slot {
                    entry: Entry::List(VecDeque::new()),
                    expires_at_ms: None,
                },
            );
        }
        match self.data.get_mut(key).map(|s| &mut s.entry) {
            None => Ok(None),
            Some(Entry::List(list)) => Ok(Some(list)),
            Some(_) => Err(wrong_type()),
        }
    }

    fn zset(&self, key: &[u8]) -> RedisResult<Vec<(Vec<u8>, f64)>> {
        match self.data.get(key).map(|s| &s.entry) {
            None => Ok(Vec::new()),
            Some(Entry::ZSet(set)) => Ok(set.clone()),
            Some(_) => Err(wrong_type()),
        }
    }

    fn zset_retain(
        &mut self,
        key: &[u8],
        keep: impl Fn(&[u8], f64) -> bool,
    ) -> RedisResult<Value> {
        let mut set = self.zset(key)?;
        let before = set.len();
        set.retain(|(m, s)| keep(m, *s));
        let removed = before - set.len();
        if set.is_empty() {
            self.data.remove(key);
        } else if let Some(slot) = self.data.get_mut(key) {
            slot.entry = Entry::ZSet(set);
        }
        Ok(Value::Int(removed as i64))
    }

    /// Executes one of the bulk-operation procedures: pages over a snapshot of
    /// the keyspace `batch` keys at a time, applying the command to matches.
    fn run_script(&mut self, source: &str, rest: &[Vec<u8>]) -> RedisResult<Value> {
        let command = [BulkCommand::Delete, BulkCommand::Unlink]
            .into_iter()
            .find(|c| c.script_source() == source)
            .ok_or_else(|| error(ErrorKind::ResponseError, "ERR unsupported script"))?;

        let num_keys = int(arg(rest, 1)?)? as usize;
        let argv = &rest[2 + num_keys..];
        let pattern = String::from_utf8_lossy(arg(argv, 0)?).into_owned();
        let batch = int(arg(argv, 1)?)?.max(1) as usize;

        let snapshot: Vec<Vec<u8>> = self.data.keys().cloned().collect();
        let mut count = 0;
        let mut cursor = 0;
        loop {
            self.scan_pages += 1;
            let end = (cursor + batch).min(snapshot.len());
            let matches: Vec<&Vec<u8>> = snapshot[cursor..end]
                .iter()
                .filter(|k| pattern_matches(&pattern, &String::from_utf8_lossy(k)))
                .collect();
            if !matches.is_empty() {
                self.calls.push(command.command().to_string());
                count += matches
                    .into_iter()
                    .filter(|k| self.data.remove(*k).is_some())
                    .count() as i64;
            }
            cursor = end;
            if cursor >= snapshot.len() {
                break;
            }
        }
        Ok(Value::Int(count))
    }
}

/// An upper bound on a score.
#[derive(Debug, Clone, Copy)]
enum Bound {
    Unbounded,
    Inclusive(f64),
    Exclusive(f64),
}

impl Bound {
    fn admits(self, score: f64) -> bool {
        match self {
            Bound::Unbounded => true,
            Bound::Inclusive(max) => score <= max,
            Bound::Exclusive(max) => score < max,
        }
    }
}

/// A parsed score bound; lower bounds are stored negated so `admits` only has
/// to implement the upper-bound comparison.
#[derive(Debug, Clone, Copy)]
struct ScoreLimit {
    lower: bool,
    bound: Bound,
}

impl ScoreLimit {
    fn admits(self, score: f64) -> bool {
        if self.lower {
            self.bound.admits(-score)
        } else {
            self.bound.admits(score)
        }
    }
}

fn bound(raw: &[u8], lower: bool) -> RedisResult<ScoreLimit> {
    let text = String::from_utf8_lossy(raw);
    let sign = if lower { -1.0 } else { 1.0 };
    let bound = match text.as_ref() {
        "-inf" | "+inf" | "inf" => {
            let infinite = if text.starts_with('-') {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
            Bound::Inclusive(sign * infinite)
        }
        exclusive if exclusive.starts_with('(') => {
            Bound::Exclusive(sign * float(exclusive[1..].as_bytes())?)
        }
        inclusive => Bound::Inclusive(sign * float(inclusive.as_bytes())?),
    };
    let bound = match bound {
        Bound::Inclusive(v) if v == f64::INFINITY => Bound::Unbounded,
        other => other,
    };
    Ok(ScoreLimit { lower, bound })
}

fn members(set: &[(Vec<u8>, f64)], with_scores: bool) -> Value {
    let mut out = Vec::new();
    for (member, score) in set {
        out.push(Value::BulkString(member.clone()));
        if with_scores {
            out.push(Value::BulkString(score.to_string().into_bytes()));
        }
    }
    Value::Array(out)
}

fn sort_zset(set: &mut [(Vec<u8>, f64)]) {
    set.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
}

/// Resolves Redis inclusive start/stop indexes (negative counts from the end)
/// into a half-open range.
fn range(len: usize, start: i64, stop: i64) -> (usize, usize) {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start > stop || start >= len {
        return (0, 0);
    }
    (start as usize, stop as usize + 1)
}

fn bulk_array(items: &[Vec<u8>]) -> Value {
    Value::Array(items.iter().cloned().map(Value::BulkString).collect())
}

fn digest(source: &str) -> String {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    format!("{:040x}", hasher.finish())
}

fn upper(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_uppercase()
}

fn arg(args: &[Vec<u8>], index: usize) -> RedisResult<&[u8]> {
    args.get(index)
        .map(Vec::as_slice)
        .ok_or_else(|| error(ErrorKind::ResponseError, "ERR wrong number of arguments"))
}

fn int(raw: &[u8]) -> RedisResult<i64> {
    String::from_utf8_lossy(raw).parse().map_err(|_| {
        error(
            ErrorKind::ResponseError,
            "ERR value is not an integer or out of range",
        )
    })
}

fn float(raw: &[u8]) -> RedisResult<f64> {
    String::from_utf8_lossy(raw)
        .parse()
        .map_err(|_| error(ErrorKind::ResponseError, "ERR value is not a valid float"))
}

fn wrong_type() -> RedisError {
    error(
        ErrorKind::ResponseError,
        "WRONGTYPE Operation against a key holding the wrong kind of value",
    )
}

fn error(kind: ErrorKind, message: &'static str) -> RedisError {
    RedisError::from((kind, message))
}

/// Splits packed RESP commands (`*N\r\n$len\r\narg\r\n...`) into argument lists.
fn parse_packed(bytes: &[u8]) -> RedisResult<Vec<Vec<Vec<u8>>>> {
    let mut commands = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let argc = read_length(bytes, &mut pos, b'*')?;
        let mut args = Vec::with_capacity(argc);
        for _ in 0..argc {
            let len = read_length(bytes, &mut pos, b'$')?;
            let end = pos + len;
            if end + 2 > bytes.len() {
                return Err(error(ErrorKind::ClientError, "truncated command"));
            }
            args.push(bytes[pos..end].to_vec());
            pos = end + 2;
        }
        if args.is_empty() {
            return Err(error(ErrorKind::ClientError, "empty command"));
        }
        commands.push(args);
    }
    Ok(commands)
}

fn read_length(bytes: &[u8], pos: &mut usize, marker: u8) -> RedisResult<usize> {
    if bytes.get(*pos) != Some(&marker) {
        return Err(error(ErrorKind::ClientError, "unexpected RESP marker"));
    }
    let start = *pos + 1;
    let len = bytes[start..]
        .windows(2)
        .position(|w| w == b"\r\n")
        .ok_or_else(|| error(ErrorKind::ClientError, "unterminated RESP line"))?;
    let number = String::from_utf8_lossy(&bytes[start..start + len])
        .parse()
        .map_err(|_| error(ErrorKind::ClientError, "invalid RESP length"))?;
    *pos = start + len + 2;
    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_packed_command() {
        let packed = redis::cmd("SET").arg("k").arg("v").get_packed_command();
        let commands = parse_packed(&packed).unwrap();
        assert_eq!(
            commands,
            vec![vec![b"SET".to_vec(), b"k".to_vec(), b"v".to_vec()]]
        );
    }

    #[test]
    fn test_range_resolution() {
        assert_eq!(range(5, 0, -1), (0, 5));
        assert_eq!(range(5, 1, 2), (1, 3));
        assert_eq!(range(5, -2, -1), (3, 5));
        assert_eq!(range(5, 3, 1), (0, 0));
        assert_eq!(range(0, 0, -1), (0, 0));
        assert_eq!(range(3, 0, 10), (0, 3));
    }

    #[test]
    fn test_score_limits() {
        let min = bound(b"-inf", true).unwrap();
        let max = bound(b"+inf", false).unwrap();
        assert!(min.admits(-1e300) && max.admits(1e300));

        let min = bound(b"(5", true).unwrap();
        assert!(!min.admits(5.0));
        assert!(min.admits(5.5));

        let max = bound(b"10", false).unwrap();
        assert!(max.admits(10.0));
        assert!(!max.admits(10.5));
    }
}
