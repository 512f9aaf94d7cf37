// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/extract.rs - Text collection from parsed board files.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use tracing::info;

use crate::parser::ParsedBoardFile;

/// Concatenates the text fields of a board.
///
/// Each placed symbol contributes `"{refdes} {value}\n"`, where the value is
/// the description of the bill-of-materials entry placed at that reference,
/// or the symbol name if there is none. Each pin then contributes
/// `"{net_name}\n"`. Both lists are walked in file order.
pub fn board_text(parsed: &ParsedBoardFile) -> String {
    let mut text = String::new();

    for symbol in &parsed.content.symbols {
        let value = parsed
            .description
            .component_at(&symbol.refdes)
            .map_or(symbol.sym_name.as_str(), |c| c.description.as_str());
        text.push_str(&symbol.refdes);
        text.push(' ');
        text.push_str(value);
        text.push('\n');
    }

    for pin in &parsed.content.pins {
        text.push_str(&pin.net_name);
        text.push('\n');
    }

    info!(
        symbols = parsed.content.symbols.len(),
        pins = parsed.content.pins.len(),
        bytes = text.len(),
        "collected board text"
    );

    text
}
