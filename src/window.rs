use crate::models::PageLink;

/// The contiguous range of page-link ordinals shown in the navigation strip,
/// together with the links themselves.
///
/// Bounds are inclusive and 1-based. Repositioning slides both bounds by the
/// same delta so the width never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    start: u32,
    end: u32,
    links: Vec<PageLink>,
}

impl PageWindow {
    pub fn new(max_display_pages: u32) -> Self {
        let width = max_display_pages.max(1);
        Self {
            start: 1,
            end: width,
            links: Vec::new(),
        }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn contains(&self, page: u32) -> bool {
        self.start <= page && page <= self.end
    }

    /// Slide the window so `target` becomes its nearest edge when it lies
    /// outside. Returns true when the bounds moved.
    pub fn slide_to(&mut self, target: u32) -> bool {
        if target < self.start {
            let delta = self.start - target;
            self.start -= delta;
            self.end -= delta;
            true
        } else if target > self.end {
            let delta = target - self.end;
            self.start += delta;
            self.end += delta;
            true
        } else {
            false
        }
    }

    /// Recompute which links are visible from the current bounds.
    pub fn recompute_visibility(&mut self) {
        let (start, end) = (self.start, self.end);
        for link in &mut self.links {
            link.visible = start <= link.page && link.page <= end;
        }
    }

    /// Replace the link strip with freshly loaded ordinals.
    pub fn replace_links(&mut self, pages: impl IntoIterator<Item = u32>) {
        self.links = pages.into_iter().map(PageLink::new).collect();
    }

    /// Clear every active marker, then mark `page`. Both steps happen under
    /// one `&mut` borrow so no caller observes the intermediate state.
    pub fn mark_active(&mut self, page: Option<u32>) {
        for link in &mut self.links {
            link.active = Some(link.page) == page;
        }
    }

    pub fn links(&self) -> &[PageLink] {
        &self.links
    }

    pub fn visible_links(&self) -> impl Iterator<Item = &PageLink> {
        self.links.iter().filter(|link| link.visible)
    }

    pub fn active_link(&self) -> Option<&PageLink> {
        self.links.iter().find(|link| link.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_with_links(max: u32, pages: u32) -> PageWindow {
        let mut window = PageWindow::new(max);
        window.replace_links(1..=pages);
        window.recompute_visibility();
        window
    }

    #[test]
    fn slide_up_keeps_width_and_aligns_end() {
        let mut window = window_with_links(20, 50);
        assert!(window.slide_to(35));
        assert_eq!((window.start(), window.end()), (16, 35));
    }

    #[test]
    fn slide_down_aligns_start() {
        let mut window = window_with_links(5, 50);
        window.slide_to(30);
        assert_eq!((window.start(), window.end()), (26, 30));
        window.slide_to(10);
        assert_eq!((window.start(), window.end()), (10, 14));
    }

    #[test]
    fn target_inside_window_does_not_move() {
        let mut window = window_with_links(5, 50);
        assert!(!window.slide_to(3));
        assert_eq!((window.start(), window.end()), (1, 5));
    }

    #[test]
    fn visibility_follows_bounds() {
        let mut window = window_with_links(3, 10);
        window.slide_to(6);
        window.recompute_visibility();
        let visible: Vec<u32> = window.visible_links().map(|l| l.page).collect();
        assert_eq!(visible, vec![4, 5, 6]);
    }

    #[test]
    fn mark_active_leaves_exactly_one() {
        let mut window = window_with_links(3, 10);
        window.mark_active(Some(2));
        window.mark_active(Some(7));
        let active: Vec<u32> = window
            .links()
            .iter()
            .filter(|l| l.active)
            .map(|l| l.page)
            .collect();
        assert_eq!(active, vec![7]);
    }

    #[test]
    fn zero_width_is_raised_to_one() {
        let window = PageWindow::new(0);
        assert_eq!((window.start(), window.end()), (1, 1));
    }
}
