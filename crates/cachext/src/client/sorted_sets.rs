//! Sorted-set commands. Members are encoded one by one; scores are sent as
//! plain numbers.

use redis::aio::ConnectionLike;
use serde::{de::DeserializeOwned, Serialize};

use cachext_core::cache::{validate_score, CacheError, Codec, Result, ScoreRange, ZAddFlags};

use super::ExtendedClient;

impl<C, K> ExtendedClient<C, K>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
    K: Codec + Clone,
{
    /// Adds members with their scores, or updates the scores of existing
    /// members. Returns the number of members added.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty `members` slice, a NaN score or
    /// conflicting flags, before anything is sent.
    pub async fn zadd<M>(&self, key: &str, members: &[(M, f64)], flags: ZAddFlags) -> Result<u64>
    where
        M: Serialize + Sync,
    {
        let condition = flags.to_arg()?;
        if members.is_empty() {
            return Err(CacheError::InvalidArgument(
                "ZADD requires at least one member".to_string(),
            ));
        }

        let mut cmd = redis::cmd("ZADD");
        cmd.arg(self.make_key(key).as_str());
        if let Some(condition) = condition {
            cmd.arg(condition);
        }
        for (member, score) in members {
            cmd.arg(validate_score(*score)?).arg(self.encode(member)?);
        }
        self.executor.execute(&cmd).await
    }

    /// Number of members with a score in `range`.
    pub async fn zcount(&self, key: &str, range: ScoreRange) -> Result<u64> {
        let key = self.make_key(key);
        let (min, max) = range.to_args()?;
        self.executor
            .execute_read(redis::cmd("ZCOUNT").arg(key.as_str()).arg(min).arg(max))
            .await
    }

    /// Members between ranks `start` and `stop`, both inclusive, lowest
    /// score first (highest first with `rev`).
    pub async fn zrange<M: DeserializeOwned>(
        &self,
        key: &str,
        start: isize,
        stop: isize,
        rev: bool,
    ) -> Result<Vec<M>> {
        let cmd = self.zrange_cmd(key, start, stop, rev, false)?;
        let members: Vec<Vec<u8>> = self.executor.execute_read(&cmd).await?;
        self.decode_all(members)
    }

    /// [`zrange`](Self::zrange) with every score passed through `cast`.
    ///
    /// ```ignore
    /// let board: Vec<(String, f64)> = client.zrange_with_scores("lb", 0, -1, false, |s| s).await?;
    /// ```
    pub async fn zrange_with_scores<M, S>(
        &self,
        key: &str,
        start: isize,
        stop: isize,
        rev: bool,
        cast: impl Fn(f64) -> S + Send,
    ) -> Result<Vec<(M, S)>>
    where
        M: DeserializeOwned,
    {
        let cmd = self.zrange_cmd(key, start, stop, rev, true)?;
        let pairs: Vec<(Vec<u8>, f64)> = self.executor.execute_read(&cmd).await?;
        self.decode_pairs(pairs, cast)
    }

    fn zrange_cmd(
        &self,
        key: &str,
        start: isize,
        stop: isize,
        rev: bool,
        with_scores: bool,
    ) -> Result<redis::Cmd> {
        let mut cmd = redis::cmd("ZRANGE");
        cmd.arg(self.make_key(key).as_str()).arg(start).arg(stop);
        if rev {
            cmd.arg("REV");
        }
        if with_scores {
            cmd.arg("WITHSCORES");
        }
        Ok(cmd)
    }

    /// Members with a score in `range`, lowest first. `limit` is an
    /// `(offset, count)` pair.
    pub async fn zrange_by_score<M: DeserializeOwned>(
        &self,
        key: &str,
        range: ScoreRange,
        limit: Option<(usize, usize)>,
    ) -> Result<Vec<M>> {
        let cmd = self.zrange_by_score_cmd(key, range, limit, false)?;
        let members: Vec<Vec<u8>> = self.executor.execute_read(&cmd).await?;
        self.decode_all(members)
    }

    pub async fn zrange_by_score_with_scores<M, S>(
        &self,
        key: &str,
        range: ScoreRange,
        limit: Option<(usize, usize)>,
        cast: impl Fn(f64) -> S + Send,
    ) -> Result<Vec<(M, S)>>
    where
        M: DeserializeOwned,
    {
        let cmd = self.zrange_by_score_cmd(key, range, limit, true)?;
        let pairs: Vec<(Vec<u8>, f64)> = self.executor.execute_read(&cmd).await?;
        self.decode_pairs(pairs, cast)
    }

    fn zrange_by_score_cmd(
        &self,
        key: &str,
        range: ScoreRange,
        limit: Option<(usize, usize)>,
        with_scores: bool,
    ) -> Result<redis::Cmd> {
        let (min, max) = range.to_args()?;
        let mut cmd = redis::cmd("ZRANGEBYSCORE");
        cmd.arg(self.make_key(key).as_str()).arg(min).arg(max);
        if with_scores {
            cmd.arg("WITHSCORES");
        }
        if let Some((offset, count)) = limit {
            cmd.arg("LIMIT").arg(offset).arg(count);
        }
        Ok(cmd)
    }

    /// Removes members with a score in `range`. Returns the number removed.
    ///
    /// [`ScoreRange::all()`] removes every member, which amounts to deleting
    /// the set.
    pub async fn zrem_range_by_score(&self, key: &str, range: ScoreRange) -> Result<u64> {
        let key = self.make_key(key);
        let (min, max) = range.to_args()?;
        if range.is_unbounded() {
            tracing::warn!(key = %key, "Removing every member of sorted set (unbounded score range)");
        }
        self.executor
            .execute(
                redis::cmd("ZREMRANGEBYSCORE")
                    .arg(key.as_str())
                    .arg(min)
                    .arg(max),
            )
            .await
    }

    /// Removes `members`. Members that are not in the set are ignored.
    pub async fn zrem<M>(&self, key: &str, members: &[M]) -> Result<u64>
    where
        M: Serialize + Sync,
    {
        let encoded = self.encode_members("ZREM", members)?;
        let key = self.make_key(key);
        self.executor
            .execute(redis::cmd("ZREM").arg(key.as_str()).arg(encoded))
            .await
    }

    fn decode_pairs<M, S>(
        &self,
        pairs: Vec<(Vec<u8>, f64)>,
        cast: impl Fn(f64) -> S,
    ) -> Result<Vec<(M, S)>>
    where
        M: DeserializeOwned,
    {
        pairs
            .into_iter()
            .map(|(member, score)| Ok((self.decode(&member)?, cast(score))))
            .collect()
    }
}
