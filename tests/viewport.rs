use std::cell::RefCell;
use std::rc::Rc;

use svgom::{Document, Element, FuzzyEq, Options, Rect, RenderingHint, Transform, Window};

fn parse(svg: &str) -> Document {
    Document::from_str(svg, Window::new(200, 100), Options::default()).unwrap()
}

fn view_box_transform(doc: &Document) -> Result<Transform, svgom::Error> {
    doc.document_element().unwrap().as_viewport().unwrap().view_box_transform()
}

#[test]
fn view_box_none() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg' width='200' height='100'
         viewBox='0 0 100 100' preserveAspectRatio='none'/>
    ");

    let ts = view_box_transform(&doc).unwrap();
    assert_eq!(ts, Transform::new(2.0, 0.0, 0.0, 1.0, 0.0, 0.0));
}

#[test]
fn view_box_meet() {
    // Size comes from the window, since width and height default to 100%.
    let doc = parse("<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'/>");

    let ts = view_box_transform(&doc).unwrap();
    assert_eq!(ts, Transform::new(1.0, 0.0, 0.0, 1.0, 50.0, 0.0));
}

#[test]
fn view_box_slice() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'
         preserveAspectRatio='xMidYMid slice'/>
    ");

    let ts = view_box_transform(&doc).unwrap();
    assert_eq!(ts, Transform::new(2.0, 0.0, 0.0, 2.0, 0.0, -50.0));
}

#[test]
fn view_box_offset() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg' width='100' height='100' viewBox='10 20 50 50'/>
    ");

    let ts = view_box_transform(&doc).unwrap();
    assert_eq!(ts, Transform::new(2.0, 0.0, 0.0, 2.0, -20.0, -40.0));
}

#[test]
fn no_view_box() {
    let doc = parse("<svg xmlns='http://www.w3.org/2000/svg' width='100' height='100'/>");
    assert!(view_box_transform(&doc).unwrap().is_default());
}

#[test]
fn negative_view_box() {
    let doc = parse("<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 -10 10'/>");
    assert!(matches!(view_box_transform(&doc), Err(svgom::Error::InvalidValue(_))));
}

#[test]
fn zero_view_box() {
    let doc = parse("<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 0 10'/>");
    assert!(matches!(view_box_transform(&doc), Err(svgom::Error::InvalidValue(_))));
}

#[test]
fn negative_view_box_propagates_to_ctm() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 10 -10'>
        <rect id='r'/>
    </svg>
    ");

    let rect = doc.get_element_by_id("r").unwrap();
    assert!(rect.as_transformable().unwrap().ctm().is_err());
}

#[test]
fn invalid_view_box_is_ignored() {
    let doc = parse("<svg xmlns='http://www.w3.org/2000/svg' width='100' height='100' viewBox='0 0 10'/>");
    let svg = doc.document_element().unwrap();
    assert_eq!(svg.as_viewport().unwrap().view_box(), None);
    assert!(view_box_transform(&doc).unwrap().is_default());
}

#[test]
fn root_ctm_is_view_box_transform() {
    let doc = parse("<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 50 50'/>");
    let vp = doc.document_element().unwrap().as_viewport().unwrap();
    assert_eq!(vp.ctm().unwrap(), vp.view_box_transform().unwrap());
    assert_eq!(vp.screen_ctm().unwrap(), vp.view_box_transform().unwrap());
}

#[test]
fn view_box_transform_is_cached() {
    let doc = parse("<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'/>");
    let ts1 = view_box_transform(&doc).unwrap();
    let ts2 = view_box_transform(&doc).unwrap();
    assert_eq!(ts1, ts2);

    let svg = doc.document_element().unwrap();
    svg.set_attribute("viewBox", "0 0 50 50");
    let ts3 = view_box_transform(&doc).unwrap();
    assert_eq!(ts3, Transform::new(2.0, 0.0, 0.0, 2.0, 50.0, 0.0));

    svg.set_attribute("preserveAspectRatio", "xMinYMin");
    let ts4 = view_box_transform(&doc).unwrap();
    assert_eq!(ts4, Transform::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0));
}

#[test]
fn nested_viewport() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg' width='200' height='200' viewBox='0 0 100 100'>
        <svg id='inner' x='10' y='20' width='50' height='50' viewBox='0 0 10 10'>
            <rect id='r'/>
        </svg>
    </svg>
    ");

    let inner = doc.get_element_by_id("inner").unwrap().as_viewport().unwrap();
    assert!(!inner.is_outermost());
    assert!(doc.document_element().unwrap().as_viewport().unwrap().is_outermost());
    assert_eq!(inner.viewport_rect(), Rect::new(10.0, 20.0, 50.0, 50.0));
    assert_eq!(inner.view_box_transform().unwrap(), Transform::new(5.0, 0.0, 0.0, 5.0, 10.0, 20.0));

    let rect = doc.get_element_by_id("r").unwrap().as_transformable().unwrap();
    assert_eq!(rect.ctm().unwrap(), Transform::new(5.0, 0.0, 0.0, 5.0, 10.0, 20.0));
    assert_eq!(rect.screen_ctm().unwrap(), Transform::new(10.0, 0.0, 0.0, 10.0, 20.0, 40.0));
}

#[test]
fn nested_percentages() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg' width='200' height='100' viewBox='0 0 400 200'>
        <svg id='inner' width='50%' height='25%'/>
    </svg>
    ");

    let inner = doc.get_element_by_id("inner").unwrap().as_viewport().unwrap();
    assert_eq!(inner.viewport_rect(), Rect::new(0.0, 0.0, 200.0, 50.0));

    // The outer viewBox changes, so the inner size must be recomputed.
    doc.document_element().unwrap().set_attribute("viewBox", "0 0 100 100");
    assert_eq!(inner.viewport_rect(), Rect::new(0.0, 0.0, 50.0, 25.0));
    assert_eq!(inner.user_rect(), Rect::new(0.0, 0.0, 50.0, 25.0));
}

#[test]
fn percentage_lengths() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 300 400'>
        <rect id='r' x='10%' y='10%' width='50%' height='50%'/>
        <circle id='c' r='10%'/>
    </svg>
    ");

    let zero = svgom::svgtypes::Length::zero();
    let rect = doc.get_element_by_id("r").unwrap();
    assert_eq!(rect.resolve_length("x", zero), 30.0);
    assert_eq!(rect.resolve_length("y", zero), 40.0);
    assert_eq!(rect.resolve_length("width", zero), 150.0);
    assert_eq!(rect.resolve_length("height", zero), 200.0);

    // Non-directional lengths resolve against the normalized diagonal.
    let circle = doc.get_element_by_id("c").unwrap();
    let diagonal = ((300.0f64 * 300.0 + 400.0 * 400.0) / 2.0).sqrt();
    assert!(circle.resolve_length("r", zero).fuzzy_eq(&(diagonal * 0.1)));
}

#[test]
fn absolute_units() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg'>
        <rect id='r' x='1in' y='2em' width='10mm' height='3pt'/>
    </svg>
    ");

    let zero = svgom::svgtypes::Length::zero();
    let rect = doc.get_element_by_id("r").unwrap();
    assert_eq!(rect.resolve_length("x", zero), 96.0);
    assert_eq!(rect.resolve_length("y", zero), 32.0);
    assert!((rect.resolve_length("width", zero) - 37.795275590551185).abs() < 1e-9);
    assert_eq!(rect.resolve_length("height", zero), 4.0);
}

#[test]
fn transform_changes_are_visible() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg'>
        <g id='g' transform='translate(10 20)'>
            <rect id='r'/>
        </g>
    </svg>
    ");

    let rect = doc.get_element_by_id("r").unwrap().as_transformable().unwrap();
    assert_eq!(rect.ctm().unwrap(), Transform::new_translate(10.0, 20.0));

    doc.get_element_by_id("g").unwrap().set_attribute("transform", "scale(2)");
    assert_eq!(rect.ctm().unwrap(), Transform::new_scale(2.0, 2.0));

    doc.get_element_by_id("g").unwrap().remove_attribute("transform");
    assert!(rect.ctm().unwrap().is_default());
}

#[test]
fn font_size_changes_are_visible() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg' width='10em' height='10em' viewBox='0 0 10 10'/>
    ");

    let svg = doc.document_element().unwrap();
    assert_eq!(view_box_transform(&doc).unwrap(), Transform::new_scale(16.0, 16.0));

    svg.set_attribute("font-size", "20");
    assert_eq!(view_box_transform(&doc).unwrap(), Transform::new_scale(20.0, 20.0));
    assert_eq!(svg.as_viewport().unwrap().viewport_rect(), Rect::new(0.0, 0.0, 200.0, 200.0));
}

#[test]
fn inherited_font_size_changes_are_visible() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg' width='100' height='100'>
        <g id='g' font-size='20'>
            <svg id='inner' width='1em' height='1em' viewBox='0 0 1 1'/>
        </g>
    </svg>
    ");

    let inner = doc.get_element_by_id("inner").unwrap().as_viewport().unwrap();
    assert_eq!(inner.view_box_transform().unwrap(), Transform::new_scale(20.0, 20.0));

    doc.get_element_by_id("g").unwrap().set_attribute("font-size", "10");
    assert_eq!(inner.view_box_transform().unwrap(), Transform::new_scale(10.0, 10.0));
    assert_eq!(inner.viewport_rect(), Rect::new(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn window_resize() {
    let window = Window::new(200, 100);
    let doc = Document::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'/>",
        window.clone(),
        Options::default(),
    ).unwrap();

    assert_eq!(view_box_transform(&doc).unwrap(), Transform::new(1.0, 0.0, 0.0, 1.0, 50.0, 0.0));

    window.resize(100, 200);
    assert_eq!(view_box_transform(&doc).unwrap(), Transform::new(1.0, 0.0, 0.0, 1.0, 0.0, 50.0));
}

#[test]
fn zoom_and_pan() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg' width='100' height='100'>
        <svg id='inner'/>
    </svg>
    ");

    let vp = doc.document_element().unwrap().as_viewport().unwrap();
    assert_eq!(vp.current_scale(), 1.0);

    vp.set_current_scale(2.0);
    vp.set_current_translate(10.0, 0.0);
    assert_eq!(vp.current_scale(), 2.0);
    assert_eq!(vp.current_translate(), (10.0, 0.0));
    assert_eq!(vp.view_box_transform().unwrap(), Transform::new(2.0, 0.0, 0.0, 2.0, 10.0, 0.0));

    // Ignored on a nested viewport.
    let inner = doc.get_element_by_id("inner").unwrap().as_viewport().unwrap();
    inner.set_current_scale(5.0);
    assert_eq!(inner.current_scale(), 1.0);
    assert_eq!(vp.current_scale(), 2.0);
}

struct TestRenderer {
    invalidated: RefCell<Vec<Rect>>,
    renders: RefCell<usize>,
}

impl svgom::Renderer for TestRenderer {
    fn rendered_bounds(&self, element: &Element, hint: RenderingHint) -> Option<Rect> {
        if hint != RenderingHint::Shape {
            return None;
        }

        let ts = element.as_transformable()?.screen_ctm().ok()?;
        let zero = svgom::svgtypes::Length::zero();
        let rect = Rect::new(
            element.resolve_length("x", zero),
            element.resolve_length("y", zero),
            element.resolve_length("width", zero),
            element.resolve_length("height", zero),
        );

        Some(rect.transform(&ts))
    }

    fn render(&self, _: &Document) {
        *self.renders.borrow_mut() += 1;
    }

    fn invalidate_rect(&self, rect: Rect) {
        self.invalidated.borrow_mut().push(rect);
    }
}

#[test]
fn rendered_bounds() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg' width='200' height='100' viewBox='0 0 100 50'>
        <rect id='r' x='0' y='0' width='100' height='50'/>
    </svg>
    ");

    let renderer = Rc::new(TestRenderer {
        invalidated: RefCell::new(Vec::new()),
        renders: RefCell::new(0),
    });
    doc.window().set_renderer(Some(renderer.clone() as Rc<dyn svgom::Renderer>));

    let rect = doc.get_element_by_id("r").unwrap();
    assert_eq!(rect.as_transformable().unwrap().ctm().unwrap(), Transform::new_scale(2.0, 2.0));
    assert_eq!(rect.rendered_bounds(), Some(Rect::new(0.0, 0.0, 200.0, 100.0)));

    rect.set_attribute("width", "50");
    let invalidated = renderer.invalidated.borrow().clone();
    assert_eq!(invalidated, vec![
        Rect::new(0.0, 0.0, 200.0, 100.0),
        Rect::new(0.0, 0.0, 100.0, 100.0),
    ]);

    doc.render();
    assert_eq!(*renderer.renders.borrow(), 1);
}

#[test]
fn no_bounds_without_renderer() {
    let doc = parse("
    <svg xmlns='http://www.w3.org/2000/svg'>
        <rect id='r' width='10' height='10'/>
    </svg>
    ");

    assert_eq!(doc.get_element_by_id("r").unwrap().rendered_bounds(), None);
}
