use crate::error::InvokerError;
use crate::signatures::{SignatureFile, SymbolSignature};
use crate::type_utils::Signature;
#[cfg(unix)]
use libloading::os::unix::{
    Library as LLNativeLibrary, // LL means libloading
    RTLD_LOCAL,
    RTLD_NOW,
};
#[cfg(windows)]
use libloading::os::windows::Library as LLNativeLibrary; // LL means libloading
use log::{debug, trace, warn};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// A typed entry point bound from a [`Library`].
///
/// The borrow on the library keeps it loaded for as long as the binding exists.
pub struct Function<'lib, Args, Res>
where
    (Args, Res): Signature<Args = Args, Output = Res>,
{
    name: String,
    signature: SymbolSignature,
    symbol: libloading::Symbol<'lib, <(Args, Res) as Signature>::Pointer>,
}

impl<'lib, Args, Res> Function<'lib, Args, Res>
where
    (Args, Res): Signature<Args = Args, Output = Res>,
{
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The signature this function was bound with.
    pub fn signature(&self) -> &SymbolSignature {
        &self.signature
    }

    /// Calls the native function synchronously on the current thread.
    ///
    /// # Safety
    ///
    /// The arguments must be what the native side expects: pointers valid for
    /// the accesses it makes, strings NUL-terminated, lengths matching their
    /// buffers. Nothing here can check that.
    pub unsafe fn call(&self, args: Args) -> Res {
        <(Args, Res) as Signature>::invoke(*self.symbol, args)
    }
}

impl<Args, Res> std::fmt::Debug for Function<'_, Args, Res>
where
    (Args, Res): Signature<Args = Args, Output = Res>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("signature", &self.signature.to_string())
            .finish()
    }
}

/// A loaded dynamic library. The actual handling is done using libloading.
///
/// The library stays loaded until [`Library::close`] is called or the value is dropped.
#[derive(Debug)]
pub struct Library {
    name: String,
    path: Option<PathBuf>,
    raw_library: libloading::Library,
    signatures: Option<SignatureFile>,
}

impl Library {
    /// Loads a library by filesystem path or by platform search name.
    ///
    /// A bare name such as `native_lib` is first handed to the platform loader
    /// as is, then retried as `libnative_lib.so` (or the platform's equivalent).
    /// When the library is a file and `<file>.signatures.json` sits next to it,
    /// that descriptor is attached.
    ///
    /// Loading runs the library's initialisation routines.
    pub fn load(name: &str) -> Result<Self, InvokerError> {
        debug!("loading library: {}", name);

        // An empty name makes the platform loader hand back the running program.
        if name.trim().is_empty() {
            return Err(InvokerError::InvalidName {
                name: name.to_string(),
            });
        }

        let load_error = |source| InvokerError::Load {
            name: name.to_string(),
            source,
        };

        let (raw_library, path) = match target(name) {
            Target::File(path) => {
                let lib = unsafe { libloading_load(path.as_os_str()) }.map_err(load_error)?;
                (lib, Some(path))
            }
            Target::Search { primary, fallback } => {
                let lib = match unsafe { libloading_load(&primary) } {
                    Ok(lib) => lib,
                    Err(e) => match fallback {
                        Some(fallback) => {
                            trace!(
                                "{}: {}, trying {}",
                                primary.to_string_lossy(),
                                e,
                                fallback.to_string_lossy()
                            );
                            unsafe { libloading_load(&fallback) }.map_err(load_error)?
                        }
                        None => return Err(load_error(e)),
                    },
                };
                // Found through the loader's search, so there is no file to look beside.
                (lib, None)
            }
        };

        let signatures = match &path {
            Some(path) => {
                let sidecar = SignatureFile::sidecar_path(path);
                if sidecar.is_file() {
                    debug!("using signature descriptor: {}", sidecar.display());
                    Some(SignatureFile::from_file(&sidecar)?)
                } else {
                    None
                }
            }
            None => None,
        };

        debug!("loaded: {}", name);

        Ok(Library {
            name: name.to_string(),
            path,
            raw_library,
            signatures,
        })
    }

    /// Attaches a signature descriptor, replacing any found next to the library.
    pub fn with_signatures(mut self, signatures: SignatureFile) -> Self {
        self.signatures = Some(signatures);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file the library was opened from, when it was opened by path.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn signatures(&self) -> Option<&SignatureFile> {
        self.signatures.as_ref()
    }

    /// Looks up `name` and binds it as `unsafe extern "C" fn(Args...) -> Res`.
    ///
    /// If a signature descriptor is attached and lists `name`, the declared
    /// signature must match it. Otherwise the binding is unchecked.
    ///
    /// # Safety
    ///
    /// The declared signature must match the native symbol's real one.
    /// A mismatch is undefined behaviour at call time, not an error here.
    pub unsafe fn get_function<Args, Res>(
        &self,
        name: &str,
    ) -> Result<Function<'_, Args, Res>, InvokerError>
    where
        (Args, Res): Signature<Args = Args, Output = Res>,
    {
        let signature = SymbolSignature::new(
            <(Args, Res) as Signature>::arg_kinds(),
            <(Args, Res) as Signature>::return_kind(),
        );

        trace!("{}: binding {} as {}", self.name, name, signature);

        let symbol = self
            .raw_library
            .get::<<(Args, Res) as Signature>::Pointer>(name.as_bytes())
            .map_err(|source| InvokerError::SymbolNotFound {
                symbol: name.to_string(),
                source,
            })?;

        match &self.signatures {
            Some(file) => {
                if !file.check(name, &signature)? {
                    warn!(
                        "{} is not listed in the signature descriptor of {}, binding unchecked",
                        name, self.name
                    );
                }
            }
            None => trace!("{}: no signature descriptor, {} is unchecked", self.name, name),
        }

        Ok(Function {
            name: name.to_string(),
            signature,
            symbol,
        })
    }

    /// Unloads the library. Every binding must be gone by now, which the
    /// borrow checker already guarantees.
    pub fn close(self) -> Result<(), InvokerError> {
        debug!("closing library: {}", self.name);

        let Library {
            name, raw_library, ..
        } = self;

        raw_library
            .close()
            .map_err(|source| InvokerError::Close { name, source })
    }
}

/// What a load name refers to.
#[derive(Debug, PartialEq)]
enum Target {
    /// An existing file, made absolute.
    File(PathBuf),
    /// A name for the platform loader, with an optional second attempt.
    Search {
        primary: OsString,
        fallback: Option<OsString>,
    },
}

fn target(name: &str) -> Target {
    let path = Path::new(name);

    // The platform loader does not search the working directory for bare names.
    if path.is_file() {
        let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        return Target::File(resolved);
    }

    if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
        return Target::Search {
            primary: name.into(),
            fallback: None,
        };
    }

    let fallback = match path.extension() {
        None => Some(libloading::library_filename(name)),
        Some(_) => None,
    };

    Target::Search {
        primary: name.into(),
        fallback,
    }
}

#[cfg(unix)]
unsafe fn libloading_load(path: &OsStr) -> Result<libloading::Library, libloading::Error> {
    LLNativeLibrary::open(Some(path), RTLD_NOW | RTLD_LOCAL).map(Into::into)
}

#[cfg(windows)]
unsafe fn libloading_load(path: &OsStr) -> Result<libloading::Library, libloading::Error> {
    LLNativeLibrary::new(path).map(Into::into)
}
