#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MockupKind {
    Phone,
    Window,
    Browser,
}

impl MockupKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Window => "window",
            Self::Browser => "browser",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MediaSide {
    Left,
    Right,
    Center,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LayoutVariant {
    PhoneShowcase,
    ContentLeadPhone,
    PhoneLeadContent,
    ContentLeadWindow,
    BrowserCentered,
}

pub const VARIANT_CYCLE: [LayoutVariant; 5] = [
    LayoutVariant::PhoneShowcase,
    LayoutVariant::ContentLeadPhone,
    LayoutVariant::PhoneLeadContent,
    LayoutVariant::ContentLeadWindow,
    LayoutVariant::BrowserCentered,
];

pub fn variant_for_index(index: usize) -> LayoutVariant {
    VARIANT_CYCLE[index % VARIANT_CYCLE.len()]
}

impl LayoutVariant {
    pub fn mockup(self) -> MockupKind {
        match self {
            Self::PhoneShowcase | Self::ContentLeadPhone | Self::PhoneLeadContent => MockupKind::Phone,
            Self::ContentLeadWindow => MockupKind::Window,
            Self::BrowserCentered => MockupKind::Browser,
        }
    }

    pub fn media_side(self) -> MediaSide {
        match self {
            Self::PhoneShowcase | Self::PhoneLeadContent => MediaSide::Left,
            Self::ContentLeadPhone | Self::ContentLeadWindow => MediaSide::Right,
            Self::BrowserCentered => MediaSide::Center,
        }
    }

    pub fn columns(self) -> usize {
        match self {
            Self::BrowserCentered => 3,
            _ => 2,
        }
    }

    // Badges sit beside the media column on the layouts that lead with it.
    pub fn badges_with_media(self) -> bool {
        matches!(self, Self::PhoneLeadContent | Self::ContentLeadWindow | Self::BrowserCentered)
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::PhoneShowcase => "variant-phone-showcase",
            Self::ContentLeadPhone => "variant-content-lead-phone",
            Self::PhoneLeadContent => "variant-phone-lead-content",
            Self::ContentLeadWindow => "variant-content-lead-window",
            Self::BrowserCentered => "variant-browser-centered",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_deterministic() {
        for index in 0..32 {
            assert_eq!(variant_for_index(index), variant_for_index(index));
        }
    }

    #[test]
    fn cycle_wraps_at_the_table_length() {
        assert_eq!(variant_for_index(0), variant_for_index(5));
        assert_eq!(variant_for_index(3), variant_for_index(8));
        assert_eq!(variant_for_index(4), LayoutVariant::BrowserCentered);
    }

    #[test]
    fn only_the_three_column_layout_centers_media() {
        for variant in VARIANT_CYCLE {
            let centered = variant.media_side() == MediaSide::Center;
            assert_eq!(centered, variant.columns() == 3);
        }
    }
}
