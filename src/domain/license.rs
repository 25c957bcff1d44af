use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

/// License identifiers a project can be scaffolded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum License {
    Mit,
    Apache2,
    Bsd3Clause,
    Gpl2,
    Gpl3,
    Lgpl3,
    Mpl2,
}

impl License {
    /// All known licenses, in display order.
    pub const ALL: [License; 7] = [
        License::Mit,
        License::Apache2,
        License::Bsd3Clause,
        License::Gpl2,
        License::Gpl3,
        License::Lgpl3,
        License::Mpl2,
    ];

    /// Canonical identifier accepted on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            License::Mit => "MIT",
            License::Apache2 => "Apache-2.0",
            License::Bsd3Clause => "BSD-3-Clause",
            License::Gpl2 => "GPLv2",
            License::Gpl3 => "GPLv3",
            License::Lgpl3 => "LGPLv3",
            License::Mpl2 => "MPL-2.0",
        }
    }

    /// SPDX expression for package manifests.
    pub fn spdx(&self) -> &'static str {
        match self {
            License::Mit => "MIT",
            License::Apache2 => "Apache-2.0",
            License::Bsd3Clause => "BSD-3-Clause",
            License::Gpl2 => "GPL-2.0-or-later",
            License::Gpl3 => "GPL-3.0-or-later",
            License::Lgpl3 => "LGPL-3.0-or-later",
            License::Mpl2 => "MPL-2.0",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            License::Mit => &["mit"],
            License::Apache2 => &["apache-2.0", "apache2", "apache"],
            License::Bsd3Clause => &["bsd-3-clause", "bsd3"],
            License::Gpl2 => &["gplv2", "gpl-2.0", "gpl2"],
            License::Gpl3 => &["gplv3", "gpl-3.0", "gpl3"],
            License::Lgpl3 => &["lgplv3", "lgpl-3.0", "lgpl3"],
            License::Mpl2 => &["mpl-2.0", "mpl2"],
        }
    }

    /// Comma separated list of canonical identifiers.
    pub fn known() -> String {
        Self::ALL
            .iter()
            .map(License::id)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Render the LICENSE file body.
    ///
    /// Permissive licenses carry their full text. Copyleft licenses and
    /// Apache/MPL carry the standard notice pointing at the full text.
    pub fn text(&self, year: i32, holder: &str) -> String {
        match self {
            License::Mit => format!(
                "MIT License\n\
                 \n\
                 Copyright (c) {year} {holder}\n\
                 \n\
                 Permission is hereby granted, free of charge, to any person obtaining a copy\n\
                 of this software and associated documentation files (the \"Software\"), to deal\n\
                 in the Software without restriction, including without limitation the rights\n\
                 to use, copy, modify, merge, publish, distribute, sublicense, and/or sell\n\
                 copies of the Software, and to permit persons to whom the Software is\n\
                 furnished to do so, subject to the following conditions:\n\
                 \n\
                 The above copyright notice and this permission notice shall be included in all\n\
                 copies or substantial portions of the Software.\n\
                 \n\
                 THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR\n\
                 IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,\n\
                 FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE\n\
                 AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER\n\
                 LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,\n\
                 OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE\n\
                 SOFTWARE.\n"
            ),
            License::Bsd3Clause => format!(
                "BSD 3-Clause License\n\
                 \n\
                 Copyright (c) {year}, {holder}\n\
                 \n\
                 Redistribution and use in source and binary forms, with or without\n\
                 modification, are permitted provided that the following conditions are met:\n\
                 \n\
                 1. Redistributions of source code must retain the above copyright notice, this\n\
                 \x20  list of conditions and the following disclaimer.\n\
                 \n\
                 2. Redistributions in binary form must reproduce the above copyright notice,\n\
                 \x20  this list of conditions and the following disclaimer in the documentation\n\
                 \x20  and/or other materials provided with the distribution.\n\
                 \n\
                 3. Neither the name of the copyright holder nor the names of its\n\
                 \x20  contributors may be used to endorse or promote products derived from\n\
                 \x20  this software without specific prior written permission.\n\
                 \n\
                 THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS \"AS IS\"\n\
                 AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE\n\
                 IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE\n\
                 DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE\n\
                 FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL\n\
                 DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR\n\
                 SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER\n\
                 CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,\n\
                 OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE\n\
                 OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.\n"
            ),
            License::Apache2 => notice(
                year,
                holder,
                "Licensed under the Apache License, Version 2.0 (the \"License\");\n\
                 you may not use this file except in compliance with the License.\n\
                 You may obtain a copy of the License at\n\
                 \n\
                 \x20   https://www.apache.org/licenses/LICENSE-2.0\n\
                 \n\
                 Unless required by applicable law or agreed to in writing, software\n\
                 distributed under the License is distributed on an \"AS IS\" BASIS,\n\
                 WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.\n\
                 See the License for the specific language governing permissions and\n\
                 limitations under the License.\n",
            ),
            License::Gpl2 => notice(year, holder, &gnu_notice("General", "2", "gpl-2.0")),
            License::Gpl3 => notice(year, holder, &gnu_notice("General", "3", "gpl-3.0")),
            License::Lgpl3 => notice(year, holder, &gnu_notice("Lesser General", "3", "lgpl-3.0")),
            License::Mpl2 => notice(
                year,
                holder,
                "This Source Code Form is subject to the terms of the Mozilla Public\n\
                 License, v. 2.0. If a copy of the MPL was not distributed with this\n\
                 file, You can obtain one at https://mozilla.org/MPL/2.0/.\n",
            ),
        }
    }
}

fn notice(year: i32, holder: &str, body: &str) -> String {
    format!("Copyright (C) {year} {holder}\n\n{body}")
}

fn gnu_notice(kind: &str, version: &str, slug: &str) -> String {
    format!(
        "This program is free software: you can redistribute it and/or modify\n\
         it under the terms of the GNU {kind} Public License as published by\n\
         the Free Software Foundation, either version {version} of the License, or\n\
         (at your option) any later version.\n\
         \n\
         This program is distributed in the hope that it will be useful,\n\
         but WITHOUT ANY WARRANTY; without even the implied warranty of\n\
         MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the\n\
         GNU {kind} Public License for more details.\n\
         \n\
         You should have received a copy of the GNU {kind} Public License\n\
         along with this program.  If not, see <https://www.gnu.org/licenses/{slug}.html>.\n"
    )
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for License {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|license| license.aliases().contains(&wanted.as_str()))
            .ok_or_else(|| DomainError::UnknownLicense {
                name: s.to_string(),
                known: Self::known(),
            })
    }
}
