use crate::render::ResultRenderer;
use pccrawler_core::{query, InvertedIndex};
use std::io::{self, BufRead, Write};

const RANKED_TERM_SEARCH: &str = "1";
const PRINT_INVERTED_INDEX: &str = "2";
const EXIT: &str = "0";

/// Menu driven session over a read-only index. Ends on `0` or end of input.
pub struct Shell<'a> {
    index: &'a InvertedIndex,
    renderer: &'a dyn ResultRenderer,
}

impl<'a> Shell<'a> {
    pub fn new(index: &'a InvertedIndex, renderer: &'a dyn ResultRenderer) -> Self {
        Self { index, renderer }
    }

    pub fn run<R: BufRead, W: Write>(&self, mut input: R, out: &mut W) -> io::Result<()> {
        loop {
            print_options(out)?;
            let Some(choice) = read_trimmed(&mut input, out, "pc-crawler> ")? else { return Ok(()) };
            match choice.as_str() {
                RANKED_TERM_SEARCH => {
                    let Some(term) = read_trimmed(&mut input, out, "pc-crawler> [Term to search:] ")? else {
                        return Ok(());
                    };
                    let word = term.split_whitespace().next().unwrap_or_default();
                    let outcome = query(self.index, word);
                    self.renderer.render_query(&outcome, out)?;
                }
                PRINT_INVERTED_INDEX => self.renderer.render_index(self.index, out)?,
                EXIT => return Ok(()),
                other => writeln!(out, "\nUnknown option {other:?}")?,
            }
        }
    }
}

fn print_options<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "--- PC-Crawler ------------------------------------------------")?;
    writeln!(out)?;
    writeln!(out, "[{RANKED_TERM_SEARCH}] Ranked term search")?;
    writeln!(out, "[{PRINT_INVERTED_INDEX}] Print inverted index")?;
    writeln!(out)?;
    writeln!(out, "[{EXIT}] EXIT")?;
    writeln!(out)
}

fn read_trimmed<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> io::Result<Option<String>> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
