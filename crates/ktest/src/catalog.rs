//! Test catalog - the ordered list of registered tests
//!
//! Registration happens before the runner starts; the runner then seals the
//! catalog and iterates a snapshot of it. The process-wide catalog used by
//! [`register_tests!`](crate::register_tests) and [`run_all`](crate::run_all)
//! is created on first access.

use crate::error::{KtestError, KtestResult};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Values a test body may return.
///
/// `()` always succeeds; `Result<(), E>` fails with its error.
pub trait TestReturn {
    fn into_result(self) -> anyhow::Result<()>;
}

impl TestReturn for () {
    fn into_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<E> TestReturn for Result<(), E>
where
    E: Into<anyhow::Error>,
{
    fn into_result(self) -> anyhow::Result<()> {
        self.map_err(Into::into)
    }
}

type TestBody = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// A named, registered test
#[derive(Clone)]
pub struct TestCase {
    name: String,
    body: TestBody,
}

impl TestCase {
    /// Create a test case. Names must be non-empty but need not be unique.
    ///
    /// A body that only diverges, such as `|| panic!(..)` or `|| todo!()`,
    /// has no inferable return type; write it as `|| -> () { panic!(..) }`.
    pub fn new<F, R>(name: impl Into<String>, body: F) -> KtestResult<Self>
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: TestReturn,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(KtestError::EmptyName);
        }
        Ok(Self {
            name,
            body: Arc::new(move || body().into_result()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the body in the current thread.
    ///
    /// Assertion failures and panics unwind out of this call; catching them
    /// is the runner's job.
    pub fn call(&self) -> anyhow::Result<()> {
        (self.body)()
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Append-only, insertion-ordered collection of tests
#[derive(Debug, Default)]
pub struct Catalog {
    cases: Mutex<Vec<TestCase>>,
    sealed: AtomicBool,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn cases(&self) -> MutexGuard<'_, Vec<TestCase>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.cases.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a test and return its index.
    pub fn try_register<F, R>(&self, name: impl Into<String>, body: F) -> KtestResult<usize>
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: TestReturn,
    {
        let case = TestCase::new(name, body)?;
        if self.is_sealed() {
            return Err(KtestError::CatalogSealed { name: case.name });
        }

        let mut cases = self.cases();
        cases.push(case);
        Ok(cases.len() - 1)
    }

    /// Append a test and return its index.
    ///
    /// # Panics
    ///
    /// Panics if the name is empty or a run has already sealed the catalog.
    ///
    /// Bodies that only diverge need an explicit return type, as described
    /// on [`TestCase::new`].
    pub fn register<F, R>(&self, name: impl Into<String>, body: F) -> usize
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: TestReturn,
    {
        match self.try_register(name, body) {
            Ok(index) => index,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn len(&self) -> usize {
        self.cases().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<TestCase> {
        self.cases().get(index).cloned()
    }

    /// Copy of the registered tests in registration order
    pub fn snapshot(&self) -> Vec<TestCase> {
        self.cases().clone()
    }

    /// Close the catalog to further registration
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::SeqCst);
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::SeqCst)
    }
}

/// The process-wide catalog
pub fn global() -> &'static Catalog {
    static GLOBAL: OnceLock<Catalog> = OnceLock::new();
    GLOBAL.get_or_init(Catalog::new)
}

/// Register a test in the process-wide catalog.
///
/// # Panics
///
/// Panics if the name is empty or the run has already started.
pub fn register<F, R>(name: impl Into<String>, body: F) -> usize
where
    F: Fn() -> R + Send + Sync + 'static,
    R: TestReturn,
{
    global().register(name, body)
}
