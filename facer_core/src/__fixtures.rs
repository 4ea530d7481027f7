use crate::face::Face;

/// A small interface description exercising every feature kind: functions,
/// getters and setters, an event, overlapping enumeration prefixes, the
/// legacy lexer enumeration, free constants, an alias, and deprecated
/// entries.
pub const SAMPLE_IFACE: &str = "\
# Interface description for the test editor.

cat Basics

# Add text to the document.
fun void AddText=2001(position length, string text)

get position GetLength=2006(,)

set void SetReadOnly=2171(bool readOnly,)

get int GetText=2182(position length, stringresult text)

get colour GetCaretFore=2138(,)

set void SetFoldLevel=2222(line line, FoldLevel level)

evt void StyleNeeded=2000(int position)

enu WhiteSpace=SCWS_
val SCWS_INVISIBLE=0
val SCWS_VISIBLEALWAYS=1

cat Deprecated
val SCWS_OLDVISIBLE=3
cat Basics

enu FindOption=SCFIND_ SCFIND_FULL_
val SCFIND_WHOLEWORD=2
val SCFIND_MATCHCASE=4
val SCFIND_FULL_WORD=8

enu Lexer=SCLEX_
val SCLEX_CONTAINER=0

val SC_CURSORNORMAL=-1
val INVALID_POSITION=-1

ali SCFIND_MATCHCASE=Sensitive

cat Deprecated
fun void SetStyleBytes=2048(position length, string styles)
";

pub fn sample_face() -> Face {
	Face::parse(SAMPLE_IFACE).unwrap()
}

/// A target file with hand-written content around one marked region. The
/// surrounding lines carry trailing whitespace on purpose.
pub const MESSAGES_TARGET: &str = "\
// Hand-written header  \t
#pragma once

//++Autogenerated messages
// stale content to be replaced
//--Autogenerated messages

// Hand-written footer\t \n";
