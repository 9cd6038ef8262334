use std::{
    collections::{HashMap, hash_map::Entry},
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{Aig, Lit, Result, aig::error::ParserError};

fn read_u64(s: &str) -> std::result::Result<u64, ParserError> {
    s.parse::<u64>()
        .map_err(|_| ParserError::InvalidToken(s.to_string() + " expected u64"))
}

fn check_even(x: u64) -> std::result::Result<(), ParserError> {
    if x & 1 == 1 {
        return Err(ParserError::InvalidToken(
            "expected literal to be even, got ".to_string() + &x.to_string(),
        ));
    }
    Ok(())
}

/// Reads the next line into `line` (cleared first), failing on end of file.
fn next_line(reader: &mut impl BufRead, line: &mut String) -> std::result::Result<(), ParserError> {
    line.clear();
    let n = reader
        .read_line(line)
        .map_err(|e| ParserError::IoError(e.to_string()))?;
    if n == 0 {
        return Err(ParserError::InvalidToken(
            "unexpected end of file".to_string(),
        ));
    }
    Ok(())
}

/// Splits a line into numeric tokens, expecting between `min` and `max` of them.
fn read_tokens(
    line: &str,
    min: usize,
    max: usize,
    what: &str,
) -> std::result::Result<Vec<u64>, ParserError> {
    let tokens = line.split_whitespace().collect::<Vec<&str>>();

    if tokens.len() < min {
        return Err(ParserError::InvalidToken(format!(
            "not enough {} tokens",
            what
        )));
    }

    if tokens.len() > max {
        return Err(ParserError::InvalidToken(format!(
            "expected nothing after {}, got {}",
            what, tokens[max]
        )));
    }

    tokens.into_iter().map(read_u64).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    m: u64,
    i: u64,
    l: u64,
    o: u64,
    a: u64,
}

impl TryFrom<&str> for Header {
    type Error = ParserError;

    fn try_from(line: &str) -> std::result::Result<Self, Self::Error> {
        let tokens = line.split_whitespace().collect::<Vec<&str>>();

        if tokens.len() < 6 {
            return Err(ParserError::InvalidToken(
                "missing header tokens".to_string(),
            ));
        }

        if tokens[0] != "aag" && tokens[0] != "aig" {
            return Err(ParserError::InvalidToken(
                "expected aag (or at least aig)".to_string(),
            ));
        }

        let m = read_u64(tokens[1])?;
        let i = read_u64(tokens[2])?;
        let l = read_u64(tokens[3])?;
        let o = read_u64(tokens[4])?;
        let a = read_u64(tokens[5])?;

        if tokens.len() > 6 {
            return Err(ParserError::UnsupportedFeature(
                "header only supports M I L O A".to_string(),
            ));
        }

        Ok(Header { m, i, l, o, a })
    }
}

/// Largest variable index accepted: node ids must fit in the 31 bits of a [`Lit`].
const MAX_VARIABLE: u64 = (1 << 31) - 1;

/// Maps AIGER variables to literals of the AIG being built.
///
/// Variable 0 is the constant. Every other variable must be defined
/// (as an input, a latch or an and gate) before it is used.
/// Only defined variables take room, whatever M the header announces.
struct VarTable {
    max_var: u64,
    vars: HashMap<u64, Lit>,
}

impl VarTable {
    fn new(header: &Header) -> std::result::Result<Self, ParserError> {
        if header.m > MAX_VARIABLE {
            return Err(ParserError::UnsupportedFeature(format!(
                "M={} exceeds the maximum variable index {}",
                header.m, MAX_VARIABLE
            )));
        }
        let defined = header
            .i
            .checked_add(header.l)
            .and_then(|n| n.checked_add(header.a));
        if defined.is_none_or(|n| n > header.m) {
            return Err(ParserError::InvalidToken(format!(
                "M={} is smaller than I+L+A",
                header.m
            )));
        }
        Ok(VarTable {
            max_var: header.m,
            vars: HashMap::new(),
        })
    }

    fn define(&mut self, lhs: u64, lit: Lit) -> std::result::Result<(), ParserError> {
        check_even(lhs)?;
        let var = lhs >> 1;
        if var > self.max_var {
            return Err(ParserError::InvalidToken(format!(
                "variable {} exceeds the maximum variable index",
                var
            )));
        }
        match self.vars.entry(var) {
            Entry::Occupied(_) => Err(ParserError::InvalidToken(format!(
                "variable {} is defined twice",
                var
            ))),
            Entry::Vacant(_) if var == 0 => Err(ParserError::InvalidToken(
                "the constant cannot be redefined".to_string(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(lit);
                Ok(())
            }
        }
    }

    fn resolve(&self, lit: u64) -> std::result::Result<Lit, ParserError> {
        let var = lit >> 1;
        let res = if var == 0 {
            Some(Lit::FALSE)
        } else {
            self.vars.get(&var).copied()
        };
        res.map(|l| l ^ (lit & 1 != 0))
            .ok_or(ParserError::UndefinedLiteral(lit))
    }
}

/// Makes room for every node announced by the header, failing instead of aborting
/// when the header asks for more than can be allocated.
fn reserve_nodes(aig: &mut Aig, header: &Header) -> std::result::Result<(), ParserError> {
    // Bounded by M, checked by VarTable::new
    let n = header.i + header.l + header.a;
    aig.nodes.try_reserve(n as usize).map_err(|_| {
        ParserError::UnsupportedFeature(format!("cannot allocate {} nodes", n))
    })
}

/// Parses a latch reset value: 0, 1 or the latch literal itself (uninitialized).
/// The value is validated but latches are not modeled.
fn check_latch_init(lhs: u64, init: u64) -> std::result::Result<(), ParserError> {
    if init == 0 || init == 1 || init == lhs {
        Ok(())
    } else {
        Err(ParserError::InvalidToken(format!(
            "expected 0 1 or latch literal {} for latch initialization, got {}",
            lhs, init
        )))
    }
}

fn read_outputs(header: &Header, reader: &mut impl BufRead) -> Result<Vec<u64>> {
    let mut outputs = Vec::new();
    let mut line = String::new();
    for _ in 0..header.o {
        next_line(reader, &mut line)?;
        outputs.push(read_tokens(&line, 1, 1, "output")?[0]);
    }
    Ok(outputs)
}

fn add_outputs(aig: &mut Aig, table: &VarTable, outputs: &[u64]) -> Result<()> {
    for &o in outputs {
        aig.add_output(table.resolve(o)?)?;
    }
    Ok(())
}

/// Parser for the ASCII AIGER format.
mod ascii {
    use std::io::BufRead;

    use super::{
        Header, VarTable, add_outputs, check_latch_init, next_line, read_outputs, read_tokens,
        reserve_nodes,
    };
    use crate::{Aig, Lit, Result, aig::error::ParserError};

    fn read_input(line: &str) -> std::result::Result<u64, ParserError> {
        let lit = read_tokens(line, 1, 1, "input")?[0];
        if lit < 2 {
            return Err(ParserError::InvalidToken(
                "input cannot be the constant".to_string(),
            ));
        }
        Ok(lit)
    }

    /// Returns the latch literal, the only part of a latch that is modeled.
    fn read_latch(line: &str) -> std::result::Result<u64, ParserError> {
        let tokens = read_tokens(line, 2, 3, "latch")?;
        let lhs = tokens[0];
        if lhs < 2 {
            return Err(ParserError::InvalidToken(
                "latch cannot be the constant".to_string(),
            ));
        }
        if let Some(&init) = tokens.get(2) {
            check_latch_init(lhs, init)?;
        }
        Ok(lhs)
    }

    fn read_and(line: &str) -> std::result::Result<(u64, u64, u64), ParserError> {
        let tokens = read_tokens(line, 3, 3, "and")?;
        if tokens[0] < 2 {
            return Err(ParserError::InvalidToken(
                "and gate cannot be the constant".to_string(),
            ));
        }
        Ok((tokens[0], tokens[1], tokens[2]))
    }

    impl Aig {
        /// Creates an AIG from an open .aag file using ASCII format.
        ///
        /// Latches are imported as extra primary inputs, after the real inputs.
        /// Symbols and comments are ignored.
        ///
        /// ```rust
        /// use aigopt::Aig;
        /// let src = "aag 3 2 0 1 1\n2\n4\n7\n6 2 4\n";
        /// let aig = Aig::from_ascii(src.as_bytes()).unwrap();
        /// assert_eq!(aig.stats().to_string(), "pis=2, pos=1, area=1, depth=1, not=1");
        /// ```
        pub fn from_ascii(mut reader: impl BufRead) -> Result<Self> {
            let mut line = String::new();

            next_line(&mut reader, &mut line)?;
            let header = Header::try_from(line.as_str())?;
            let mut table = VarTable::new(&header)?;
            let mut aig = Aig::new();
            reserve_nodes(&mut aig, &header)?;

            for _ in 0..header.i {
                next_line(&mut reader, &mut line)?;
                let lhs = read_input(&line)?;
                table.define(lhs, Lit::new(aig.add_input(), false))?;
            }

            for _ in 0..header.l {
                next_line(&mut reader, &mut line)?;
                let lhs = read_latch(&line)?;
                table.define(lhs, Lit::new(aig.add_input(), false))?;
            }

            // Outputs may refer to and gates defined below
            let outputs = read_outputs(&header, &mut reader)?;

            for _ in 0..header.a {
                next_line(&mut reader, &mut line)?;
                let (lhs, rhs0, rhs1) = read_and(&line)?;
                let res = aig.add_and(table.resolve(rhs0)?, table.resolve(rhs1)?)?;
                table.define(lhs, res)?;
            }

            add_outputs(&mut aig, &table, &outputs)?;
            Ok(aig)
        }
    }

}

/// Parser for the bin AIGER format.
mod bin {
    use std::io::{BufRead, Read};

    use super::{
        Header, VarTable, add_outputs, check_latch_init, next_line, read_outputs, read_tokens,
        reserve_nodes,
    };
    use crate::{Aig, Lit, Result, aig::error::ParserError};

    fn next_byte(buf: &[u8], offset: &mut usize) -> std::result::Result<u8, ParserError> {
        let byte = *buf.get(*offset).ok_or_else(|| {
            ParserError::InvalidToken("unexpected end of file".to_string())
        })?;
        *offset += 1;
        Ok(byte)
    }

    /// Decodes one delta: 7 bits per byte, least significant group first,
    /// high bit set on every byte but the last.
    fn decode_delta(buf: &[u8], offset: &mut usize) -> std::result::Result<u64, ParserError> {
        let mut x = 0;
        let mut shift = 0;

        loop {
            let ch = next_byte(buf, offset)?;
            if shift >= 64 {
                return Err(ParserError::InvalidToken("delta overflows u64".to_string()));
            }
            x |= ((ch & 0x7f) as u64) << shift;
            shift += 7;

            if ch & 0x80 == 0 {
                return Ok(x);
            }
        }
    }

    impl Aig {
        /// Creates an AIG from an open .aig file using binary format.
        ///
        /// As with [`Aig::from_ascii`], latches are imported as extra primary inputs.
        pub fn from_bin(mut reader: impl BufRead) -> Result<Self> {
            let mut line = String::new();

            next_line(&mut reader, &mut line)?;
            let header = Header::try_from(line.as_str())?;
            let mut table = VarTable::new(&header)?;
            let mut aig = Aig::new();
            reserve_nodes(&mut aig, &header)?;

            // Inputs are implicit
            for k in 0..header.i {
                table.define(2 * (1 + k), Lit::new(aig.add_input(), false))?;
            }

            // Latches only carry their next state and reset value
            for k in 0..header.l {
                next_line(&mut reader, &mut line)?;
                let lhs = 2 * (1 + header.i + k);
                let tokens = read_tokens(&line, 1, 2, "latch")?;
                if let Some(&init) = tokens.get(1) {
                    check_latch_init(lhs, init)?;
                }
                table.define(lhs, Lit::new(aig.add_input(), false))?;
            }

            let outputs = read_outputs(&header, &mut reader)?;

            let mut buf = Vec::new();
            reader
                .read_to_end(&mut buf)
                .map_err(|e| ParserError::IoError(e.to_string()))?;

            let mut offset = 0;
            let mut lhs = 2 * (1 + header.i + header.l);
            for _ in 0..header.a {
                let delta0 = decode_delta(&buf, &mut offset)?;
                let delta1 = decode_delta(&buf, &mut offset)?;

                let rhs0 = lhs.checked_sub(delta0).ok_or_else(|| {
                    ParserError::InvalidToken(format!("invalid delta {} for gate {}", delta0, lhs))
                })?;
                let rhs1 = rhs0.checked_sub(delta1).ok_or_else(|| {
                    ParserError::InvalidToken(format!("invalid delta {} for gate {}", delta1, lhs))
                })?;

                let res = aig.add_and(table.resolve(rhs0)?, table.resolve(rhs1)?)?;
                table.define(lhs, res)?;
                lhs += 2;
            }

            add_outputs(&mut aig, &table, &outputs)?;
            Ok(aig)
        }
    }

}

impl Aig {
    /// Creates an AIG from an .aig (resp .aag) file using bin (resp. ASCII) AIGER format.
    ///
    /// Only the combinational part is modeled: latches become extra primary inputs.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(path.as_ref()).map_err(|z| ParserError::IoError(z.to_string()))?;
        let reader = BufReader::new(f);
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("aag") => Aig::from_ascii(reader),
            Some("aig") => Aig::from_bin(reader),
            _ => Err(
                ParserError::IoError("invalid extension, expected .aag or .aig".to_string()).into(),
            ),
        }
    }
}
