//! Resolution through the C library's host lookup routines.
//!
//! The C library offers two routines for the same job with very different
//! thread-safety stories. `gethostbyname` returns a pointer into static
//! storage and must never be entered by two threads at once, so it can
//! only be used through the [`NonReentrant`] capability, which carries the
//! exclusive lock. `gethostbyname_r` is reentrant and needs nothing but a
//! private scratch buffer per call, allocated and released on every call
//! regardless of how the call exits.

use crate::outcome::{FailureKind, Outcome};
use crate::strategy::BlockingResolve;
use std::ffi::{CStr, CString};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::slice;
use std::sync::Mutex;

//------------ Module Configuration ------------------------------------------

/// The scratch buffer handed to the reentrant routine on every call.
#[cfg(target_os = "linux")]
const SCRATCH_SIZE: usize = 4096;

// The C library's host lookup entry points. The libc crate provides the
// `hostent` type but not these routines, so they are declared here.
extern "C" {
    fn gethostbyname(name: *const libc::c_char) -> *mut libc::hostent;

    #[cfg(target_os = "linux")]
    fn gethostbyname_r(
        name: *const libc::c_char,
        ret: *mut libc::hostent,
        buf: *mut libc::c_char,
        buflen: libc::size_t,
        result: *mut *mut libc::hostent,
        h_errnop: *mut libc::c_int,
    ) -> libc::c_int;
}

//------------ HostLookupRoutine ---------------------------------------------

/// A native routine mapping a host name to its first address.
pub trait HostLookupRoutine: Send + Sync {
    /// Looks up the given name, returning the first address found.
    fn lookup(&self, name: &CStr) -> Result<IpAddr, NativeError>;
}

//------------ NonReentrant --------------------------------------------------

/// A host lookup routine that must never be entered concurrently.
///
/// The wrapper owns the exclusive lock and is the only way to invoke such
/// a routine, so holding a `NonReentrant<R>` is holding the proof that all
/// calls are serialized. The lock is private to the routine it wraps and
/// has no effect on the concurrency bound of any other strategy.
pub struct NonReentrant<R> {
    routine: R,
    lock: Mutex<()>,
}

impl<R> NonReentrant<R> {
    /// Wraps a routine together with its exclusive lock.
    pub fn new(routine: R) -> Self {
        NonReentrant {
            routine,
            lock: Mutex::new(()),
        }
    }
}

impl<R: HostLookupRoutine> NonReentrant<R> {
    /// Looks up a name while holding the exclusive lock.
    pub fn lookup(&self, name: &CStr) -> Result<IpAddr, NativeError> {
        // A poisoned lock means a caller panicked inside the routine; the
        // C library state is no worse than after any failed call, so keep
        // going with the same exclusion.
        let _guard = match self.lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.routine.lookup(name)
    }
}

//------------ GetHostByName -------------------------------------------------

/// The classic, non-reentrant `gethostbyname(3)`.
///
/// The returned entry lives in static storage inside the C library, which
/// is why this type only implements [`HostLookupRoutine`] for use inside
/// [`NonReentrant`].
#[derive(Clone, Copy, Debug, Default)]
pub struct GetHostByName;

impl HostLookupRoutine for GetHostByName {
    fn lookup(&self, name: &CStr) -> Result<IpAddr, NativeError> {
        let entry = unsafe { gethostbyname(name.as_ptr()) };
        if entry.is_null() {
            return Err(NativeError::NotFound);
        }
        unsafe { entry_address(entry) }
    }
}

//------------ GetHostByNameR ------------------------------------------------

/// The reentrant `gethostbyname_r(3)`.
///
/// Every call gets its own scratch buffer which the entry's pointers refer
/// into; the buffer is released when the call returns, on every exit path.
#[cfg(target_os = "linux")]
#[derive(Clone, Copy, Debug, Default)]
pub struct GetHostByNameR;

#[cfg(target_os = "linux")]
impl HostLookupRoutine for GetHostByNameR {
    fn lookup(&self, name: &CStr) -> Result<IpAddr, NativeError> {
        let mut scratch = vec![0 as libc::c_char; SCRATCH_SIZE];
        let mut entry = unsafe { std::mem::zeroed::<libc::hostent>() };
        let mut result: *mut libc::hostent = std::ptr::null_mut();
        let mut h_errno: libc::c_int = 0;

        let rc = unsafe {
            gethostbyname_r(
                name.as_ptr(),
                &mut entry,
                scratch.as_mut_ptr(),
                scratch.len(),
                &mut result,
                &mut h_errno,
            )
        };
        if rc != 0 {
            return Err(NativeError::Routine(rc));
        }
        if result.is_null() {
            return Err(NativeError::NotFound);
        }
        // The entry borrows from `scratch`, so the address must be copied
        // out before the buffer is dropped.
        unsafe { entry_address(result) }
    }
}

//------------ Entry parsing -------------------------------------------------

/// Extracts the first address from a host entry.
///
/// The entry must point to a live `hostent` whose address list remains
/// valid for the duration of the call.
unsafe fn entry_address(
    entry: *const libc::hostent,
) -> Result<IpAddr, NativeError> {
    let entry = &*entry;
    if entry.h_addrtype != libc::AF_INET {
        return Err(NativeError::BadFamily(entry.h_addrtype));
    }
    if entry.h_length != 4 {
        return Err(NativeError::BadLength(entry.h_length));
    }
    if entry.h_addr_list.is_null() {
        return Err(NativeError::NoAddresses);
    }
    let first = *entry.h_addr_list;
    if first.is_null() {
        return Err(NativeError::NoAddresses);
    }
    let octets = slice::from_raw_parts(first as *const u8, 4);
    Ok(IpAddr::V4(Ipv4Addr::new(
        octets[0], octets[1], octets[2], octets[3],
    )))
}

//------------ NativeError ---------------------------------------------------

/// A failed native host lookup.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NativeError {
    /// The routine ran but knows no such host.
    NotFound,

    /// The routine itself failed with the given return code.
    Routine(i32),

    /// The entry carries an address family other than IPv4.
    BadFamily(i32),

    /// The entry carries addresses of an unexpected length.
    BadLength(i32),

    /// The entry carries no addresses at all.
    NoAddresses,
}

impl NativeError {
    /// Converts the error into the outcome for the given domain.
    pub fn into_outcome(self, domain: &str) -> Outcome {
        match self {
            NativeError::NotFound => Outcome::failure(
                FailureKind::UnknownHost,
                format!("can't resolve {}", domain),
            ),
            _ => Outcome::failure(
                FailureKind::Protocol,
                format!("can't resolve {}: {}", domain, self),
            ),
        }
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NativeError::NotFound => f.write_str("host not found"),
            NativeError::Routine(rc) => {
                write!(f, "routine failed with code {}", rc)
            }
            NativeError::BadFamily(family) => {
                write!(f, "unexpected address family {}", family)
            }
            NativeError::BadLength(len) => {
                write!(f, "unexpected address length {}", len)
            }
            NativeError::NoAddresses => f.write_str("entry is empty"),
        }
    }
}

//------------ NativeUnsafeResolver ------------------------------------------

/// The strategy over the non-reentrant routine.
#[derive(Debug, Default)]
pub struct NativeUnsafeResolver {
    routine: NonReentrant<GetHostByName>,
}

impl NativeUnsafeResolver {
    /// Creates the strategy, locking included.
    pub fn new() -> Self {
        NativeUnsafeResolver {
            routine: NonReentrant::new(GetHostByName),
        }
    }
}

impl BlockingResolve for NativeUnsafeResolver {
    fn label(&self) -> &str {
        "native-unsafe"
    }

    fn resolve(&self, domain: &str) -> Outcome {
        let name = match CString::new(domain) {
            Ok(name) => name,
            Err(err) => return Outcome::malformed(err.to_string()),
        };
        match self.routine.lookup(&name) {
            Ok(addr) => Outcome::Success(addr),
            Err(err) => err.into_outcome(domain),
        }
    }
}

//------------ NativeSafeResolver --------------------------------------------

/// The strategy over the reentrant routine. No lock, a scratch per call.
#[cfg(target_os = "linux")]
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeSafeResolver {
    routine: GetHostByNameR,
}

#[cfg(target_os = "linux")]
impl NativeSafeResolver {
    /// Creates the strategy.
    pub fn new() -> Self {
        NativeSafeResolver {
            routine: GetHostByNameR,
        }
    }
}

#[cfg(target_os = "linux")]
impl BlockingResolve for NativeSafeResolver {
    fn label(&self) -> &str {
        "native-safe"
    }

    fn resolve(&self, domain: &str) -> Outcome {
        let name = match CString::new(domain) {
            Ok(name) => name,
            Err(err) => return Outcome::malformed(err.to_string()),
        };
        match self.routine.lookup(&name) {
            Ok(addr) => Outcome::Success(addr),
            Err(err) => err.into_outcome(domain),
        }
    }
}

//--- Default

impl<R: Default> Default for NonReentrant<R> {
    fn default() -> Self {
        NonReentrant::new(R::default())
    }
}

impl<R: fmt::Debug> fmt::Debug for NonReentrant<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NonReentrant")
            .field("routine", &self.routine)
            .finish()
    }
}

//============ Testing =======================================================
