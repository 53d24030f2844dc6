use crate::error::{Error, Result};
use crate::schema;
use rusqlite::Connection;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Total time acquire() may spend waiting for a busy pool to free up.
const ACQUIRE_WAIT_BUDGET: Duration = Duration::from_secs(5);

/// Single wait slice between re-checks, so a returned connection is
/// picked up promptly.
const ACQUIRE_WAIT_SLICE: Duration = Duration::from_millis(250);

enum PoolTarget {
    File(PathBuf),
    /// Single shared in-memory connection for tests; never grown or
    /// health-checked since re-opening would discard the data.
    Memory,
}

struct PoolState {
    idle: Vec<Connection>,
    /// Connections currently alive, idle or checked out.
    total: usize,
}

struct PoolInner {
    target: PoolTarget,
    capacity: usize,
    state: Mutex<PoolState>,
    returned: Condvar,
}

/// Bounded SQLite connection pool.
///
/// Acquisition follows one algorithm for every caller: take an idle
/// connection if a healthy one exists, open a new one while under
/// capacity, otherwise wait for a return within a fixed budget.
#[derive(Clone)]
pub struct ConnectionPool {
    inner: Arc<PoolInner>,
}

impl ConnectionPool {
    pub fn open(path: PathBuf, capacity: usize) -> Result<Self> {
        let pool = Self {
            inner: Arc::new(PoolInner {
                target: PoolTarget::File(path),
                capacity: capacity.max(1),
                state: Mutex::new(PoolState {
                    idle: Vec::new(),
                    total: 0,
                }),
                returned: Condvar::new(),
            }),
        };
        // Open one connection eagerly so schema problems surface here.
        let first = pool.acquire()?;
        drop(first);
        Ok(pool)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::configure_connection(&conn)?;
        Ok(Self {
            inner: Arc::new(PoolInner {
                target: PoolTarget::Memory,
                capacity: 1,
                state: Mutex::new(PoolState {
                    idle: vec![conn],
                    total: 1,
                }),
                returned: Condvar::new(),
            }),
        })
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    pub fn acquire(&self) -> Result<PooledConnection> {
        let deadline = Instant::now() + ACQUIRE_WAIT_BUDGET;
        let mut state = self
            .inner
            .state
            .lock()
            .map_err(|_| Error::Query("connection pool mutex poisoned".into()))?;

        loop {
            // 1. Reuse an idle connection, discarding any that fail the
            //    health check.
            while let Some(conn) = state.idle.pop() {
                if self.is_healthy(&conn) {
                    return Ok(self.guard(conn));
                }
                state.total -= 1;
            }

            // 2. Grow while under capacity.
            if state.total < self.inner.capacity {
                state.total += 1;
                drop(state);
                match self.open_connection() {
                    Ok(conn) => return Ok(self.guard(conn)),
                    Err(err) => {
                        if let Ok(mut state) = self.inner.state.lock() {
                            state.total -= 1;
                        }
                        return Err(err);
                    }
                }
            }

            // 3. Wait for a return, within the budget.
            let now = Instant::now();
            if now >= deadline {
                return Err(Error::PoolExhausted {
                    capacity: self.inner.capacity,
                    waited: ACQUIRE_WAIT_BUDGET,
                });
            }
            let slice = ACQUIRE_WAIT_SLICE.min(deadline - now);
            let (next, _timeout) = self
                .inner
                .returned
                .wait_timeout(state, slice)
                .map_err(|_| Error::Query("connection pool mutex poisoned".into()))?;
            state = next;
        }
    }

    fn open_connection(&self) -> Result<Connection> {
        match &self.inner.target {
            PoolTarget::File(path) => {
                let conn = Connection::open(path)?;
                schema::configure_connection(&conn)?;
                Ok(conn)
            }
            // Capacity 1 means this is unreachable once the initial
            // connection exists.
            PoolTarget::Memory => {
                let conn = Connection::open_in_memory()?;
                schema::configure_connection(&conn)?;
                Ok(conn)
            }
        }
    }

    fn is_healthy(&self, conn: &Connection) -> bool {
        match self.inner.target {
            PoolTarget::Memory => true,
            PoolTarget::File(_) => conn
                .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .is_ok(),
        }
    }

    fn guard(&self, conn: Connection) -> PooledConnection {
        PooledConnection {
            conn: Some(conn),
            pool: Arc::clone(&self.inner),
        }
    }
}

/// A checked-out connection; returns itself to the pool on drop.
pub struct PooledConnection {
    conn: Option<Connection>,
    pool: Arc<PoolInner>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn.as_ref().expect("connection taken")
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        self.conn.as_mut().expect("connection taken")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Ok(mut state) = self.pool.state.lock() {
                state.idle.push(conn);
                self.pool.returned.notify_one();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connections_are_reused_after_return() {
        let dir = tempfile::tempdir().unwrap();
        let pool = ConnectionPool::open(dir.path().join("c.db"), 2).unwrap();

        let a = pool.acquire().unwrap();
        drop(a);
        let _b = pool.acquire().unwrap();

        let state = pool.inner.state.lock().unwrap();
        assert_eq!(state.total, 1, "returned connection should be reused");
    }

    #[test]
    fn pool_grows_only_to_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let pool = ConnectionPool::open(dir.path().join("c.db"), 2).unwrap();

        let _a = pool.acquire().unwrap();
        let _b = pool.acquire().unwrap();
        let state = pool.inner.state.lock().unwrap();
        assert_eq!(state.total, 2);
    }

    #[test]
    fn waiting_acquire_gets_a_returned_connection() {
        let dir = tempfile::tempdir().unwrap();
        let pool = ConnectionPool::open(dir.path().join("c.db"), 1).unwrap();

        let held = pool.acquire().unwrap();
        let pool2 = pool.clone();
        let waiter = std::thread::spawn(move || pool2.acquire().map(|_| ()));

        std::thread::sleep(Duration::from_millis(50));
        drop(held);
        waiter.join().unwrap().unwrap();
    }
}
