//! Dense row-major grid storage and the windows that borrow it.

use thiserror::Error;

use crate::{Point, Size};

/// Errors raised when addressing a [`Grid`] or one of its windows.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The point lies outside the addressed area.
    #[error("index out of range: {point} is outside a {size} area")]
    OutOfRange {
        /// Point that failed validation, expressed in the addressed area's coordinates.
        point: Point,
        /// Extents of the area that rejected the point.
        size: Size,
    },
}

/// Read access shared by grids and the windows borrowing them.
pub trait GridView<T> {
    /// Extents of the addressable area.
    fn size(&self) -> Size;

    /// Retrieves the cell at the provided point.
    fn at(&self, point: Point) -> Result<&T, GridError>;
}

/// Write access shared by grids and mutable windows.
pub trait GridViewMut<T>: GridView<T> {
    /// Retrieves the cell at the provided point for mutation.
    fn at_mut(&mut self, point: Point) -> Result<&mut T, GridError>;

    /// Replaces the cell at the provided point.
    fn set(&mut self, point: Point, value: T) -> Result<(), GridError> {
        *self.at_mut(point)? = value;
        Ok(())
    }
}

/// Owned, fixed-size 2D container with bounds-checked addressing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    size: Size,
    cells: Vec<T>,
}

impl<T: Default> Grid<T> {
    /// Creates a grid whose cells are all default-constructed.
    #[must_use]
    pub fn new(size: Size) -> Self {
        let mut cells = Vec::with_capacity(size.area());
        cells.resize_with(size.area(), T::default);
        Self { size, cells }
    }

    /// Resets every cell to its default value.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = T::default());
    }
}

impl<T> Grid<T> {
    /// Creates a grid by evaluating `init` for every point in row-major order.
    #[must_use]
    pub fn from_fn(size: Size, mut init: impl FnMut(Point) -> T) -> Self {
        let cells = points(size).map(&mut init).collect();
        Self { size, cells }
    }

    /// Extents of the grid.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Retrieves the cell at the provided point.
    pub fn at(&self, point: Point) -> Result<&T, GridError> {
        let index = self.index(point)?;
        self.cells.get(index).ok_or(GridError::OutOfRange {
            point,
            size: self.size,
        })
    }

    /// Retrieves the cell at the provided point for mutation.
    pub fn at_mut(&mut self, point: Point) -> Result<&mut T, GridError> {
        let index = self.index(point)?;
        let size = self.size;
        self.cells
            .get_mut(index)
            .ok_or(GridError::OutOfRange { point, size })
    }

    /// Replaces the cell at the provided point.
    pub fn set(&mut self, point: Point, value: T) -> Result<(), GridError> {
        *self.at_mut(point)? = value;
        Ok(())
    }

    /// Iterates over every point of the grid in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        points(self.size)
    }

    /// Borrows a read-only window of the grid.
    ///
    /// Fails when the window does not fit entirely inside the grid.
    pub fn span(&self, origin: Point, size: Size) -> Result<SubSpan<'_, T>, GridError> {
        check_window(self.size, origin, size)?;
        Ok(SubSpan {
            grid: self,
            origin,
            size,
        })
    }

    /// Borrows a mutable window of the grid.
    ///
    /// Fails when the window does not fit entirely inside the grid.
    pub fn span_mut(&mut self, origin: Point, size: Size) -> Result<SubSpanMut<'_, T>, GridError> {
        check_window(self.size, origin, size)?;
        Ok(SubSpanMut {
            grid: self,
            origin,
            size,
        })
    }

    fn index(&self, point: Point) -> Result<usize, GridError> {
        if self.size.contains(point) {
            Ok(point.y * self.size.width + point.x)
        } else {
            Err(GridError::OutOfRange {
                point,
                size: self.size,
            })
        }
    }
}

impl<T> GridView<T> for Grid<T> {
    fn size(&self) -> Size {
        Grid::size(self)
    }

    fn at(&self, point: Point) -> Result<&T, GridError> {
        Grid::at(self, point)
    }
}

impl<T> GridViewMut<T> for Grid<T> {
    fn at_mut(&mut self, point: Point) -> Result<&mut T, GridError> {
        Grid::at_mut(self, point)
    }
}

/// Read-only rectangular window into a [`Grid`] with re-based coordinates.
#[derive(Debug)]
pub struct SubSpan<'a, T> {
    grid: &'a Grid<T>,
    origin: Point,
    size: Size,
}

impl<T> Clone for SubSpan<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SubSpan<'_, T> {}

impl<'a, T> SubSpan<'a, T> {
    /// Position of the window's top-left cell in the backing grid.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Extents of the window.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Retrieves the cell at a window-local point.
    pub fn at(&self, point: Point) -> Result<&'a T, GridError> {
        check_local(self.size, point)?;
        self.grid.at(self.origin + point)
    }

    /// Borrows a narrower window expressed in this window's coordinates.
    pub fn span(&self, origin: Point, size: Size) -> Result<SubSpan<'a, T>, GridError> {
        check_window(self.size, origin, size)?;
        Ok(SubSpan {
            grid: self.grid,
            origin: self.origin + origin,
            size,
        })
    }
}

impl<T> GridView<T> for SubSpan<'_, T> {
    fn size(&self) -> Size {
        self.size
    }

    fn at(&self, point: Point) -> Result<&T, GridError> {
        SubSpan::at(self, point)
    }
}

/// Mutable rectangular window into a [`Grid`] with re-based coordinates.
#[derive(Debug)]
pub struct SubSpanMut<'a, T> {
    grid: &'a mut Grid<T>,
    origin: Point,
    size: Size,
}

impl<T> SubSpanMut<'_, T> {
    /// Position of the window's top-left cell in the backing grid.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Extents of the window.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Retrieves the cell at a window-local point.
    pub fn at(&self, point: Point) -> Result<&T, GridError> {
        check_local(self.size, point)?;
        self.grid.at(self.origin + point)
    }

    /// Retrieves the cell at a window-local point for mutation.
    pub fn at_mut(&mut self, point: Point) -> Result<&mut T, GridError> {
        check_local(self.size, point)?;
        self.grid.at_mut(self.origin + point)
    }

    /// Replaces the cell at a window-local point.
    pub fn set(&mut self, point: Point, value: T) -> Result<(), GridError> {
        *self.at_mut(point)? = value;
        Ok(())
    }

    /// Reborrows a narrower mutable window expressed in this window's coordinates.
    pub fn span_mut(&mut self, origin: Point, size: Size) -> Result<SubSpanMut<'_, T>, GridError> {
        check_window(self.size, origin, size)?;
        Ok(SubSpanMut {
            origin: self.origin + origin,
            grid: &mut *self.grid,
            size,
        })
    }
}

impl<T> GridView<T> for SubSpanMut<'_, T> {
    fn size(&self) -> Size {
        self.size
    }

    fn at(&self, point: Point) -> Result<&T, GridError> {
        SubSpanMut::at(self, point)
    }
}

impl<T> GridViewMut<T> for SubSpanMut<'_, T> {
    fn at_mut(&mut self, point: Point) -> Result<&mut T, GridError> {
        SubSpanMut::at_mut(self, point)
    }
}

/// Assigns `value` to every cell of the target.
pub fn fill<T, G>(target: &mut G, value: &T) -> Result<(), GridError>
where
    T: Clone,
    G: GridViewMut<T> + ?Sized,
{
    for point in points(target.size()) {
        target.set(point, value.clone())?;
    }
    Ok(())
}

/// Assigns `value` to the outermost ring of cells of the target.
pub fn fill_border<T, G>(target: &mut G, value: &T) -> Result<(), GridError>
where
    T: Clone,
    G: GridViewMut<T> + ?Sized,
{
    let size = target.size();
    for point in points(size) {
        let on_border = point.x == 0
            || point.y == 0
            || point.x + 1 == size.width
            || point.y + 1 == size.height;
        if on_border {
            target.set(point, value.clone())?;
        }
    }
    Ok(())
}

/// Assigns `value` along the straight line between two points, inclusive.
///
/// Nothing is written when either endpoint lies outside the target.
pub fn fill_line<T, G>(target: &mut G, from: Point, to: Point, value: &T) -> Result<(), GridError>
where
    T: Clone,
    G: GridViewMut<T> + ?Sized,
{
    check_local(target.size(), from)?;
    check_local(target.size(), to)?;
    let (mut x0, mut y0) = (from.x as isize, from.y as isize);
    let (x1, y1) = (to.x as isize, to.y as isize);

    let dx = (x1 - x0).abs();
    let step_x = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let step_y = if y0 < y1 { 1 } else { -1 };
    let mut error = dx + dy;

    loop {
        target.set(Point::new(x0 as usize, y0 as usize), value.clone())?;
        if x0 == x1 && y0 == y1 {
            break;
        }

        let doubled = 2 * error;
        if doubled >= dy {
            if x0 == x1 {
                break;
            }
            error += dy;
            x0 += step_x;
        }
        if doubled <= dx {
            if y0 == y1 {
                break;
            }
            error += dx;
            y0 += step_y;
        }
    }

    Ok(())
}

pub(crate) fn points(size: Size) -> impl Iterator<Item = Point> {
    (0..size.height).flat_map(move |y| (0..size.width).map(move |x| Point::new(x, y)))
}

fn check_local(size: Size, point: Point) -> Result<(), GridError> {
    if size.contains(point) {
        Ok(())
    } else {
        Err(GridError::OutOfRange { point, size })
    }
}

fn check_window(outer: Size, origin: Point, size: Size) -> Result<(), GridError> {
    let fits = |start: usize, extent: usize, limit: usize| {
        start.checked_add(extent).is_some_and(|end| end <= limit)
    };

    if fits(origin.x, size.width, outer.width) && fits(origin.y, size.height, outer.height) {
        Ok(())
    } else {
        let far_corner = Point::new(
            origin.x.saturating_add(size.width.saturating_sub(1)),
            origin.y.saturating_add(size.height.saturating_sub(1)),
        );
        Err(GridError::OutOfRange {
            point: far_corner,
            size: outer,
        })
    }
}
