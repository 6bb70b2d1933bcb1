// src/attendance/aggregate.rs
//
// sessions + students (concurrent) → past sessions → one session_info call per
// past session (concurrent) → all-or-nothing join.

use std::{future::Future, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::task::JoinSet;

use crate::capture::Credentials;
use crate::config::{
    consts::{SESSIONS_ENDPOINT, SESSION_ENDPOINT, STUDENTS_ENDPOINT},
    options::{FetchOptions, RowOrder},
};
use crate::progress::Progress;
use super::api::{AttendanceApi, FetchError};
use super::model::{Session, SessionInfo, Student};

/// Result of one run: rows in the chosen order plus the roster.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attendance {
    pub sessions: Vec<SessionInfo>,
    pub roster: Vec<Student>,
    /// Sessions left out because they end after `now` or have no readable end.
    pub skipped: usize,
}

/// Sessions whose meeting has ended at or before `now`, with their index in
/// the original list.
pub fn past_sessions(sessions: &[Session], now: DateTime<Utc>) -> Vec<(usize, &Session)> {
    sessions
        .iter()
        .enumerate()
        .filter(|(_, s)| match s.meeting.end_instant() {
            Some(end) => end <= now,
            None => {
                logw!("Aggregate: unreadable endTime {:?} for meeting {}, skipped", s.meeting.end_time, s.meeting.id);
                false
            }
        })
        .collect()
}

async fn timed<T, F>(limit: Option<Duration>, endpoint: &str, fut: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    match limit {
        Some(d) => tokio::time::timeout(d, fut).await.unwrap_or_else(|_| {
            Err(FetchError::Timeout { endpoint: s!(endpoint), secs: d.as_secs() })
        }),
        None => fut.await,
    }
}

/// Run the whole fan-out. The first failure aborts every fetch still in
/// flight and is returned as the run's only error.
pub async fn run(
    api: Arc<dyn AttendanceApi>,
    creds: &Credentials,
    opts: &FetchOptions,
    now: DateTime<Utc>,
    mut progress: Option<&mut dyn Progress>,
) -> Result<Attendance, FetchError> {
    let limit = opts.request_timeout();

    if let Some(p) = progress.as_deref_mut() {
        p.log("Fetching sessions and roster…");
    }
    let (sessions, roster) = tokio::try_join!(
        timed(limit, SESSIONS_ENDPOINT, api.sessions(creds)),
        timed(limit, STUDENTS_ENDPOINT, api.students(creds)),
    )?;

    let past = past_sessions(&sessions, now);
    let skipped = sessions.len() - past.len();
    logf!(
        "Aggregate: course {} sessions={} past={} students={}",
        creds.course_id, sessions.len(), past.len(), roster.len()
    );

    if let Some(p) = progress.as_deref_mut() {
        p.begin(past.len());
    }

    let creds = Arc::new(creds.clone());
    let mut set = JoinSet::new();
    for (ix, session) in past {
        let api = Arc::clone(&api);
        let creds = Arc::clone(&creds);
        let id = session.meeting.id.clone();
        set.spawn(async move {
            let info = timed(limit, SESSION_ENDPOINT, api.session_info(&creds, &id)).await;
            (ix, info)
        });
    }

    let mut rows: Vec<(usize, SessionInfo)> = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        let (ix, info) = match joined {
            Ok((ix, Ok(info))) => (ix, info),
            Ok((ix, Err(e))) => {
                loge!("Aggregate: session #{ix} failed: {e}");
                set.abort_all();
                if let Some(p) = progress.as_deref_mut() {
                    p.finish();
                }
                return Err(e);
            }
            Err(e) => {
                set.abort_all();
                if let Some(p) = progress.as_deref_mut() {
                    p.finish();
                }
                return Err(FetchError::Join(e.to_string()));
            }
        };
        if info.students.len() != roster.len() {
            logw!(
                "Aggregate: {:?} lists {} outcomes for a roster of {}; columns align by position",
                info.name, info.students.len(), roster.len()
            );
        }
        if let Some(p) = progress.as_deref_mut() {
            p.item_done(&info.name);
        }
        rows.push((ix, info));
    }

    if opts.row_order == RowOrder::Schedule {
        rows.sort_by_key(|(ix, _)| *ix);
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    Ok(Attendance {
        sessions: rows.into_iter().map(|(_, info)| info).collect(),
        roster,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::model::Meeting;
    use crate::core::WireId;

    fn session(id: u64, end: &str) -> Session {
        Session {
            meeting: Meeting { id: WireId::from(id), start_time: s!(), end_time: s!(end) },
        }
    }

    #[test]
    fn end_boundary_is_inclusive() {
        let now: DateTime<Utc> = "2024-05-01T12:00:00Z".parse().unwrap();
        let list = vec![
            session(1, "2024-05-01T11:59:59Z"),
            session(2, "2024-05-01T12:00:00Z"),
            session(3, "2024-05-01T12:00:01Z"),
            session(4, "garbage"),
            session(5, ""),
        ];
        let ids: Vec<usize> = past_sessions(&list, now).into_iter().map(|(ix, _)| ix).collect();
        assert_eq!(ids, vec![0, 1]);
    }
}
