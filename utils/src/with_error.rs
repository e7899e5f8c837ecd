// Copyright © moderator-assistant 2026-present
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::convert::Infallible;
use std::error;
use std::fmt::Display;

use color_eyre::eyre::{ContextCompat, WrapErr};

use crate::outcome::{Fatal, Value};

/// Equivalent to `color_eyre::bail!`. Immediately returns a [Fatal]
/// programmer error from the enclosing function.
#[macro_export]
macro_rules! fail {
    ($msg:literal $(,)?) => {
        return std::result::Result::Err($crate::outcome::Fatal(color_eyre::eyre::eyre!($msg)));
    };
    ($err:expr $(,)?) => {
        return std::result::Result::Err($crate::outcome::Fatal(color_eyre::eyre::eyre!($err)));
    };
    ($fmt:expr, $($arg:tt)*) => {
        return std::result::Result::Err($crate::outcome::Fatal(color_eyre::eyre::eyre!($fmt, $($arg)*)));
    };
}

/// Equivalent to `color_eyre::ensure!`. Returns a [Fatal] programmer error if
/// the given predicate evaluates to false.
#[macro_export]
macro_rules! verify {
    ($cond:expr $(,)?) => {
        if !$cond {
            $crate::fail!(concat!("Invariant violated: `", stringify!($cond), "`"));
        }
    };
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            $crate::fail!($msg);
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            $crate::fail!($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::fail!($fmt, $($arg)*);
        }
    };
}

pub trait WithError<T, E> {
    /// Wraps the error value with additional context that is evaluated
    /// lazily, only once an error actually occurs, and converts it into a
    /// [Fatal] programmer error.
    fn with_error<C, F>(self, f: F) -> Value<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> WithError<T, E> for Result<T, E>
where
    E: error::Error + Send + Sync + 'static,
{
    fn with_error<C, F>(self, context: F) -> Value<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.with_context(context).map_err(Fatal)
    }
}

impl<T> WithError<T, Infallible> for Option<T> {
    fn with_error<C, F>(self, context: F) -> Value<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.with_context(context).map_err(Fatal)
    }
}
