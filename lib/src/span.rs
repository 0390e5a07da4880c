/// Half-open byte range `[begin, end)` into the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    pub fn new(begin: usize, end: usize) -> Self {
        if begin <= end {
            Self { begin, end }
        } else {
            Self {
                begin: end,
                end: begin,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn locate(&self, src: &str) -> (Pos, Pos) {
        (Pos::at(src, self.begin), Pos::at(src, self.end))
    }
}

/// Zero-based line and byte column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pos {
    pub ln: usize,
    pub col: usize,
}

impl Pos {
    pub fn at(src: &str, offset: usize) -> Self {
        let mut offset = offset.min(src.len());
        while !src.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &src[..offset];
        let ln = before.matches('\n').count();
        let col = offset - before.rfind('\n').map_or(0, |i| i + 1);
        Self { ln, col }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chunk<T> {
    pub data: T,
    pub span: Span,
}

impl<T> Chunk<T> {
    pub fn new(data: T, span: Span) -> Self {
        Self { data, span }
    }
}
